use crate::error::SceneError;
use meshopt::VertexDataAdapter;
use scene_geometry_disk::meshlet::{
	MESHLET_CONE_WEIGHT, MESHLET_MAX_TRIANGLES, MESHLET_MAX_VERTICES, MeshletBuffers, MeshletData, PackedTriangle,
};
use scene_geometry_disk::primitive::PrimitiveData;
use scene_geometry_disk::range::RangeU32;
use scene_geometry_disk::vertex::VertexBuffer;

/// Positions are the first attribute of every vertex layout.
pub fn position_adapter(vertices: &VertexBuffer) -> anyhow::Result<VertexDataAdapter<'_>> {
	VertexDataAdapter::new(vertices.as_bytes(), vertices.stride(), 0)
		.map_err(|err| anyhow::anyhow!("invalid vertex layout for meshopt: {err:?}"))
}

/// Builds meshlets for every primitive and concatenates them, primitive N owning `primitive_meshlets[N]`.
#[profiling::function]
pub fn build_meshlets(
	vertices: &VertexBuffer,
	indices: &[u32],
	primitives: &[PrimitiveData],
) -> anyhow::Result<MeshletBuffers> {
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
			build_primitive_meshlets(&adapter, &indices[p.index_range()])
		})
		.collect()
}

/// Splits a triangle list with global vertex ids into meshlets of at most [`MESHLET_MAX_VERTICES`] vertices and
/// [`MESHLET_MAX_TRIANGLES`] triangles, packing each triangle's local indices into one word.
pub fn build_primitive_meshlets(adapter: &VertexDataAdapter<'_>, indices: &[u32]) -> anyhow::Result<MeshletBuffers> {
	if indices.is_empty() {
		Err(SceneError::EmptyGeometry)?;
	}

	let out = {
		profiling::scope!("meshopt::build_meshlets");
		meshopt::build_meshlets(
			indices,
			adapter,
			MESHLET_MAX_VERTICES as usize,
			MESHLET_MAX_TRIANGLES as usize,
			MESHLET_CONE_WEIGHT,
		)
	};

	let mut triangles = Vec::with_capacity(indices.len() / 3);
	let meshlets = out
		.meshlets
		.iter()
		.zip(out.iter())
		.map(|(m, meshlet)| {
			let data = MeshletData {
				vertex_offset: m.vertex_offset,
				triangle_offset: triangles.len() as u32,
				vertex_count: m.vertex_count,
				triangle_count: m.triangle_count,
			};
			triangles.extend(
				meshlet
					.triangles
					.chunks_exact(3)
					.map(|t| PackedTriangle::new(u32::from(t[0]), u32::from(t[1]), u32::from(t[2]))),
			);
			data
		})
		.collect::<Vec<_>>();

	Ok(MeshletBuffers {
		primitive_meshlets: vec![RangeU32::new(0, meshlets.len() as u32)],
		meshlets,
		vertices: out.vertices,
		triangles,
	})
}
