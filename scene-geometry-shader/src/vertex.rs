use bytemuck_derive::{Pod, Zeroable};
use core::mem::size_of;
use glam::{Vec2, Vec3, Vec4};
use static_assertions::const_assert_eq;

/// A vertex without skinning attributes. Every attribute occupies its own 16 byte slot, so `position` is always at
/// offset 0 and the stride is a multiple of 16.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct Vertex {
	pub position: Vec3,
	pub _pad0: f32,
	pub normal: Vec3,
	pub _pad1: f32,
	pub uv: Vec2,
	pub _pad2: [f32; 2],
	pub color: Vec4,
	pub tangent: Vec4,
}
const_assert_eq!(size_of::<Vertex>(), 5 * 16);

impl Vertex {
	pub fn new(position: Vec3, normal: Vec3, uv: Vec2, color: Vec4, tangent: Vec4) -> Self {
		Self {
			position,
			_pad0: 0.,
			normal,
			_pad1: 0.,
			uv,
			_pad2: [0.; 2],
			color,
			tangent,
		}
	}
}

impl AsRef<Vertex> for Vertex {
	fn as_ref(&self) -> &Vertex {
		self
	}
}

/// A [`Vertex`] extended by 4 joint indices and their weights. Joint indices are stored as floats, as shaders expect.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct SkinnedVertex {
	pub vertex: Vertex,
	pub joints: Vec4,
	pub weights: Vec4,
}
const_assert_eq!(size_of::<SkinnedVertex>(), 7 * 16);

impl AsRef<Vertex> for SkinnedVertex {
	fn as_ref(&self) -> &Vertex {
		&self.vertex
	}
}

pub const VERTEX_STRIDE: usize = size_of::<Vertex>();
pub const SKINNED_VERTEX_STRIDE: usize = size_of::<SkinnedVertex>();
