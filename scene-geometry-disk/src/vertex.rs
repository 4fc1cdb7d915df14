use glam::{Vec3, Vec4};
use rkyv::{Archive, Deserialize, Serialize};
pub use scene_geometry_shader::vertex::*;
use std::ops::Range;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Archive, Serialize, Deserialize)]
pub enum VertexLayout {
	Simple,
	Skinned,
}

impl VertexLayout {
	pub fn stride(&self) -> usize {
		match self {
			VertexLayout::Simple => VERTEX_STRIDE,
			VertexLayout::Skinned => SKINNED_VERTEX_STRIDE,
		}
	}
}

/// Joint indices and weights of a skinned vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SkinAttributes {
	pub joints: Vec4,
	pub weights: Vec4,
}

/// The vertices of a whole scene in exactly one layout. Positions are always the first attribute, so
/// [`Self::as_bytes`] with [`Self::stride`] can be handed to anything expecting strided positions.
#[derive(Clone, Debug, Archive, Serialize, Deserialize)]
pub enum VertexBuffer {
	Simple(Vec<Vertex>),
	Skinned(Vec<SkinnedVertex>),
}

impl VertexBuffer {
	pub fn new(layout: VertexLayout) -> Self {
		match layout {
			VertexLayout::Simple => VertexBuffer::Simple(Vec::new()),
			VertexLayout::Skinned => VertexBuffer::Skinned(Vec::new()),
		}
	}

	pub fn layout(&self) -> VertexLayout {
		match self {
			VertexBuffer::Simple(_) => VertexLayout::Simple,
			VertexBuffer::Skinned(_) => VertexLayout::Skinned,
		}
	}

	pub fn stride(&self) -> usize {
		self.layout().stride()
	}

	pub fn len(&self) -> usize {
		match self {
			VertexBuffer::Simple(vec) => vec.len(),
			VertexBuffer::Skinned(vec) => vec.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn as_bytes(&self) -> &[u8] {
		match self {
			VertexBuffer::Simple(vec) => bytemuck::cast_slice(vec),
			VertexBuffer::Skinned(vec) => bytemuck::cast_slice(vec),
		}
	}

	/// Pushes a vertex. Skin attributes are dropped for the simple layout and default to zero for the skinned one.
	pub fn push(&mut self, vertex: Vertex, skin: Option<SkinAttributes>) {
		match self {
			VertexBuffer::Simple(vec) => vec.push(vertex),
			VertexBuffer::Skinned(vec) => {
				let skin = skin.unwrap_or_default();
				vec.push(SkinnedVertex {
					vertex,
					joints: skin.joints,
					weights: skin.weights,
				})
			}
		}
	}

	pub fn vertex(&self, index: usize) -> &Vertex {
		match self {
			VertexBuffer::Simple(vec) => &vec[index],
			VertexBuffer::Skinned(vec) => &vec[index].vertex,
		}
	}

	pub fn position(&self, index: usize) -> Vec3 {
		self.vertex(index).position
	}

	pub fn positions(&self, range: Range<usize>) -> impl Iterator<Item = Vec3> + '_ {
		range.map(|i| self.position(i))
	}

	pub fn for_each_mut(&mut self, range: Range<usize>, mut f: impl FnMut(&mut Vertex)) {
		match self {
			VertexBuffer::Simple(vec) => vec[range].iter_mut().for_each(f),
			VertexBuffer::Skinned(vec) => vec[range].iter_mut().for_each(|v| f(&mut v.vertex)),
		}
	}
}
