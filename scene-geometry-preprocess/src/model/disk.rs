use crate::model::Model;
use scene_geometry_disk::primitive::MeshData;
use scene_geometry_disk::scene::PreparedSceneDisk;
use scene_geometry_disk::stats::SceneStats;

impl Model {
	pub fn stats(&self) -> SceneStats {
		SceneStats {
			meshes: self.meshes.len() as u32,
			primitives: self.primitives.len() as u32,
			vertices: self.vertices.len() as u32,
			indices: self.indices.len() as u32,
			triangles: self.indices.len() as u32 / 3,
			meshlets: self.meshlets.as_ref().map_or(0, |m| m.meshlets.len() as u32),
			meshlet_vertices: self.meshlets.as_ref().map_or(0, |m| m.vertices.len() as u32),
			clusters: self.clusters.as_ref().map_or(0, |c| c.clusters.len() as u32),
			bounds_min: self.dimensions.min,
			bounds_max: self.dimensions.max,
		}
	}

	#[profiling::function]
	pub fn into_disk(self) -> PreparedSceneDisk {
		let stats = self.stats();
		let geometry_nodes = self.config.geometry_nodes();
		let meshes = self
			.meshes
			.iter()
			.map(|mesh| MeshData {
				name: mesh.name.clone(),
				primitives: mesh.primitives,
				transform: mesh.uniform.matrix,
			})
			.collect();
		PreparedSceneDisk {
			vertices: self.vertices,
			indices: self.indices,
			primitives: self.primitives,
			meshes,
			materials: self.materials,
			images: self.images,
			meshlets: self.meshlets,
			clusters: self.clusters,
			geometry_nodes,
			stats,
		}
	}
}
