use bytemuck_derive::{Pod, Zeroable};
use core::mem::size_of;
use glam::Mat4;
use static_assertions::const_assert_eq;

pub const MAX_NUM_JOINTS: usize = 64;

/// Per mesh uniform block: model matrix, skinning joint matrices and the amount of joints used.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniform {
	pub matrix: Mat4,
	pub joint_matrices: [Mat4; MAX_NUM_JOINTS],
	pub joint_count: u32,
	pub _pad: [u32; 3],
}
const_assert_eq!(size_of::<MeshUniform>(), 64 * (1 + MAX_NUM_JOINTS) + 16);

impl Default for MeshUniform {
	fn default() -> Self {
		Self::new(Mat4::IDENTITY)
	}
}

impl MeshUniform {
	pub fn new(matrix: Mat4) -> Self {
		Self {
			matrix,
			joint_matrices: [Mat4::IDENTITY; MAX_NUM_JOINTS],
			joint_count: 0,
			_pad: [0; 3],
		}
	}

	pub fn joints(&self) -> &[Mat4] {
		&self.joint_matrices[..self.joint_count as usize]
	}
}
