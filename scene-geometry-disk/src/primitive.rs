use glam::Mat4;
use rkyv::{Archive, Deserialize, Serialize};
use scene_geometry_shader::cluster::BBox;
use scene_geometry_shader::range::RangeU32;
use std::ops::Range;

/// A range of triangles within the scene's global vertex and index arrays. Indices are global, so every index lies
/// within `first_vertex..first_vertex + vertex_count`.
#[derive(Copy, Clone, Debug, PartialEq, Archive, Serialize, Deserialize)]
pub struct PrimitiveData {
	pub first_index: u32,
	pub index_count: u32,
	pub first_vertex: u32,
	pub vertex_count: u32,
	/// index into the scene's materials, primitives without a material use the default material at the end
	pub material: u32,
	/// in mesh space, or world space if vertices were pre-transformed
	pub bounds: BBox,
}

impl PrimitiveData {
	pub fn index_range(&self) -> Range<usize> {
		self.first_index as usize..(self.first_index + self.index_count) as usize
	}

	pub fn vertex_range(&self) -> Range<usize> {
		self.first_vertex as usize..(self.first_vertex + self.vertex_count) as usize
	}

	pub fn first_triangle(&self) -> u32 {
		self.first_index / 3
	}

	pub fn triangle_count(&self) -> u32 {
		self.index_count / 3
	}
}

/// A mesh instanced by exactly one node.
#[derive(Clone, Debug, PartialEq, Archive, Serialize, Deserialize)]
pub struct MeshData {
	pub name: Option<String>,
	/// contiguous range of the scene's primitives
	pub primitives: RangeU32,
	/// world transform of the owning node, identity if vertices were pre-transformed
	pub transform: Mat4,
}
