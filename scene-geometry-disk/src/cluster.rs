use rkyv::{Archive, Deserialize, Serialize};
pub use scene_geometry_shader::cluster::*;
use scene_geometry_shader::range::RangeU32;

/// Spatial clusters of all primitives of a scene. `clusters` and `bboxes` run in parallel.
#[derive(Clone, Debug, Default, Archive, Serialize, Deserialize)]
pub struct ClusterBuffers {
	pub clusters: Vec<ClusterData>,
	/// cluster local vertex to global vertex id
	pub local_vertices: Vec<u32>,
	/// 3 local vertex indices per triangle
	pub local_indices: Vec<u8>,
	pub bboxes: Vec<BBox>,
	/// the clusters of primitive N are `clusters[primitive_clusters[N]]`
	pub primitive_clusters: Vec<RangeU32>,
}

impl ClusterBuffers {
	/// Appends the clusters of another primitive, fixing up their local offsets. `first_triangle` is global already.
	pub fn append(&mut self, other: &mut Self) {
		let vertices_start = self.local_vertices.len() as u32;
		let triangle_start = (self.local_indices.len() / 3) as u32;
		let cluster_start = self.clusters.len() as u32;
		self.local_vertices.append(&mut other.local_vertices);
		self.local_indices.append(&mut other.local_indices);
		self.bboxes.append(&mut other.bboxes);

		for c in &mut other.clusters {
			c.first_local_vertex += vertices_start;
			c.first_local_triangle += triangle_start;
		}
		self.clusters.append(&mut other.clusters);
		self.primitive_clusters.extend(
			other
				.primitive_clusters
				.drain(..)
				.map(|r| RangeU32::new(r.start + cluster_start, r.end + cluster_start)),
		);
	}

	pub fn len(&self) -> usize {
		self.clusters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clusters.is_empty()
	}

	pub fn local_vertices_of(&self, cluster: usize) -> &[u32] {
		&self.local_vertices[self.clusters[cluster].local_vertex_range()]
	}

	/// triangles of a cluster with global vertex ids, resolved through the cluster's local vertices
	pub fn triangles_of(&self, cluster: usize) -> impl Iterator<Item = [u32; 3]> + '_ {
		let vertices = self.local_vertices_of(cluster);
		self.local_indices[self.clusters[cluster].local_index_range()]
			.chunks_exact(3)
			.map(move |t| [t[0], t[1], t[2]].map(|i| vertices[i as usize]))
	}
}

impl FromIterator<ClusterBuffers> for ClusterBuffers {
	fn from_iter<T: IntoIterator<Item = ClusterBuffers>>(iter: T) -> Self {
		let mut out = ClusterBuffers::default();
		for mut e in iter {
			out.append(&mut e);
		}
		out
	}
}
