use crate::error::SceneError;
use crate::meshlet::position_adapter;
use meshopt::VertexDataAdapter;
use scene_geometry_disk::cluster::{
	BBox, CLUSTER_CONE_WEIGHT, CLUSTER_FILL_WEIGHT, CLUSTER_MAX_TRIANGLES, CLUSTER_MAX_VERTICES, CLUSTER_MIN_TRIANGLES, ClusterBuffers,
	ClusterData,
};
use scene_geometry_disk::primitive::PrimitiveData;
use scene_geometry_disk::range::RangeU32;
use scene_geometry_disk::vertex::VertexBuffer;

/// Builds spatial clusters for every primitive, reordering each primitive's indices in place so the triangles of a
/// cluster are contiguous. Primitive index ranges stay valid.
#[profiling::function]
pub fn build_clusters(
	vertices: &VertexBuffer,
	indices: &mut [u32],
	primitives: &[PrimitiveData],
) -> anyhow::Result<ClusterBuffers> {
	if vertices.is_empty() || indices.is_empty() {
		Err(SceneError::EmptyGeometry)?;
	}
	let adapter = position_adapter(vertices)?;
	primitives
		.iter()
		.map(|p| {
			if p.vertex_count == 0 {
				Err(SceneError::EmptyGeometry)?;
			}
			build_primitive_clusters(vertices, &adapter, &mut indices[p.index_range()], p.first_triangle())
		})
		.collect()
}

/// Clusters the triangle list `indices` with global vertex ids, whose first triangle is `first_triangle` in the
/// global index buffer, and rewrites `indices` in cluster order.
pub fn build_primitive_clusters(
	vertices: &VertexBuffer,
	adapter: &VertexDataAdapter<'_>,
	indices: &mut [u32],
	first_triangle: u32,
) -> anyhow::Result<ClusterBuffers> {
	if indices.is_empty() {
		Err(SceneError::EmptyGeometry)?;
	}

	let out = {
		profiling::scope!("meshopt::build_meshlets_flex");
		meshopt::build_meshlets_flex(
			indices,
			adapter,
			CLUSTER_MAX_VERTICES as usize,
			CLUSTER_MIN_TRIANGLES as usize,
			CLUSTER_MAX_TRIANGLES as usize,
			CLUSTER_CONE_WEIGHT,
			CLUSTER_FILL_WEIGHT,
		)
	};

	let mut buffers = ClusterBuffers {
		clusters: Vec::with_capacity(out.len()),
		local_vertices: Vec::with_capacity(out.vertices.len()),
		local_indices: Vec::with_capacity(indices.len()),
		bboxes: Vec::with_capacity(out.len()),
		primitive_clusters: vec![RangeU32::new(0, out.len() as u32)],
	};
	let mut reordered = Vec::with_capacity(indices.len());
	for cluster in out.iter() {
		let num_triangles = cluster.triangles.len() / 3;
		buffers.clusters.push(ClusterData {
			num_vertices: cluster.vertices.len() as u16,
			num_triangles: num_triangles as u16,
			first_triangle: first_triangle + (reordered.len() / 3) as u32,
			first_local_vertex: buffers.local_vertices.len() as u32,
			first_local_triangle: (buffers.local_indices.len() / 3) as u32,
		});
		buffers.bboxes.push(BBox::from_points(
			cluster.vertices.iter().map(|&v| vertices.position(v as usize)),
		));
		// local triangle index to cluster local vertex to global vertex id
		reordered.extend(cluster.triangles.iter().map(|&t| cluster.vertices[t as usize]));
		buffers.local_vertices.extend_from_slice(cluster.vertices);
		buffers.local_indices.extend_from_slice(cluster.triangles);
	}

	if reordered.len() != indices.len() {
		Err(SceneError::ClusterCoverageMismatch {
			expected: indices.len(),
			covered: reordered.len(),
		})?;
	}
	indices.copy_from_slice(&reordered);
	Ok(buffers)
}
