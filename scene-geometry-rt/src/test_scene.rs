//! A small hand built prepared scene: two meshes, three primitives, one cluster per primitive.

use glam::{Mat4, Vec2, Vec3, Vec4};
use scene_geometry_disk::cluster::{BBox, ClusterBuffers, ClusterData};
use scene_geometry_disk::material::MaterialData;
use scene_geometry_disk::primitive::{MeshData, PrimitiveData};
use scene_geometry_disk::range::RangeU32;
use scene_geometry_disk::scene::{GeometryNodeGranularity, PreparedSceneDisk};
use scene_geometry_disk::stats::SceneStats;
use scene_geometry_disk::vertex::{VertexBuffer, VertexLayout};
use scene_geometry_shader::vertex::Vertex;

pub const BASE_COLOR: u32 = 2;
pub const OCCLUSION: u32 = 5;

struct Builder {
	vertices: VertexBuffer,
	indices: Vec<u32>,
	primitives: Vec<PrimitiveData>,
}

impl Builder {
	fn primitive(&mut self, positions: &[Vec3], local_indices: &[u32], material: u32) {
		let first_vertex = self.vertices.len() as u32;
		let first_index = self.indices.len() as u32;
		for &position in positions {
			self.vertices
				.push(Vertex::new(position, Vec3::Z, Vec2::ZERO, Vec4::ONE, Vec4::ZERO), None);
		}
		self.indices.extend(local_indices.iter().map(|i| i + first_vertex));
		self.primitives.push(PrimitiveData {
			first_index,
			index_count: local_indices.len() as u32,
			first_vertex,
			vertex_count: positions.len() as u32,
			material,
			bounds: BBox::from_points(positions.iter().copied()),
		});
	}
}

/// One cluster per primitive covering all of its triangles.
fn clusters(primitives: &[PrimitiveData], indices: &[u32]) -> ClusterBuffers {
	let mut clusters = ClusterBuffers::default();
	for (i, primitive) in primitives.iter().enumerate() {
		clusters.clusters.push(ClusterData {
			num_vertices: primitive.vertex_count as u16,
			num_triangles: primitive.triangle_count() as u16,
			first_triangle: primitive.first_triangle(),
			first_local_vertex: clusters.local_vertices.len() as u32,
			first_local_triangle: (clusters.local_indices.len() / 3) as u32,
		});
		clusters.local_vertices.extend(primitive.vertex_range().map(|v| v as u32));
		clusters.local_indices.extend(
			indices[primitive.index_range()]
				.iter()
				.map(|&index| (index - primitive.first_vertex) as u8),
		);
		clusters.bboxes.push(primitive.bounds);
		clusters.primitive_clusters.push(RangeU32::with_len(i as u32, 1));
	}
	clusters
}

pub fn test_scene(geometry_nodes: GeometryNodeGranularity, with_clusters: bool) -> PreparedSceneDisk {
	let mut b = Builder {
		vertices: VertexBuffer::new(VertexLayout::Simple),
		indices: Vec::new(),
		primitives: Vec::new(),
	};
	b.primitive(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[0, 1, 2], 0);
	b.primitive(&[Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y], &[0, 1, 2, 0, 2, 3], 1);
	b.primitive(&[Vec3::ZERO, Vec3::Y, Vec3::Z], &[0, 1, 2], 0);

	let materials = vec![
		MaterialData {
			base_color_texture: Some(BASE_COLOR),
			occlusion_texture: Some(OCCLUSION),
			..MaterialData::default()
		},
		MaterialData::default(),
	];
	let meshes = vec![
		MeshData {
			name: Some("first".to_string()),
			primitives: RangeU32::new(0, 2),
			transform: Mat4::IDENTITY,
		},
		MeshData {
			name: None,
			primitives: RangeU32::new(2, 3),
			transform: Mat4::from_translation(Vec3::new(5., 0., 0.)),
		},
	];
	let clusters = with_clusters.then(|| clusters(&b.primitives, &b.indices));
	PreparedSceneDisk {
		stats: SceneStats {
			meshes: 2,
			primitives: 3,
			vertices: b.vertices.len() as u32,
			indices: b.indices.len() as u32,
			triangles: b.indices.len() as u32 / 3,
			clusters: clusters.as_ref().map_or(0, |c| c.len() as u32),
			..SceneStats::default()
		},
		vertices: b.vertices,
		indices: b.indices,
		primitives: b.primitives,
		meshes,
		materials,
		images: Vec::new(),
		meshlets: None,
		clusters,
		geometry_nodes,
	}
}
