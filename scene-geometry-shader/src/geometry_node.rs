use bytemuck_derive::{Pod, Zeroable};
use core::mem::size_of;
use static_assertions::const_assert_eq;

/// Texture index written when a material has no such texture.
pub const NO_TEXTURE: i32 = -1;

pub fn texture_index(index: Option<u32>) -> i32 {
	index.map_or(NO_TEXTURE, |i| i as i32)
}

/// Locates the geometry of one primitive by device address.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct GeometryNodePerPrimitive {
	pub vertex_buffer_address: u64,
	/// already offset to the primitive's first index
	pub index_buffer_address: u64,
	pub base_color_texture_index: i32,
	pub occlusion_texture_index: i32,
}
const_assert_eq!(size_of::<GeometryNodePerPrimitive>(), 24);

/// Running offsets of one mesh into the scene's vertex, index and [`MeshPrimitive`] arrays.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct GeometryNodePerMesh {
	pub vertex_start_offset: u32,
	pub index_start_offset: u32,
	pub primitive_start_offset: u32,
}
const_assert_eq!(size_of::<GeometryNodePerMesh>(), 12);

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct MeshPrimitive {
	pub vertex_start_offset_in_mesh: u32,
	pub index_start_offset_in_mesh: u32,
	pub base_color_texture_index: i32,
	pub occlusion_texture_index: i32,
}
const_assert_eq!(size_of::<MeshPrimitive>(), 16);
