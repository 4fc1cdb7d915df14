use bytemuck_derive::{Pod, Zeroable};
use core::fmt::{Debug, Formatter};
use core::mem::size_of;
use glam::UVec3;
use static_assertions::const_assert_eq;

pub const MESHLET_MAX_VERTICES: u32 = 64;
pub const MESHLET_MAX_TRIANGLES: u32 = 124;
pub const MESHLET_CONE_WEIGHT: f32 = 0.;

/// Bits used by a single local vertex index within a [`PackedTriangle`].
pub const PACKED_INDEX_BITS: u32 = 8;
pub const PACKED_INDEX_MASK: u32 = (1 << PACKED_INDEX_BITS) - 1;

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct MeshletData {
	/// first entry in the meshlet-vertex array, which maps local to global vertex ids
	pub vertex_offset: u32,
	/// first entry in the packed triangle array
	pub triangle_offset: u32,
	pub vertex_count: u32,
	pub triangle_count: u32,
}
const_assert_eq!(size_of::<MeshletData>(), 16);

impl MeshletData {
	pub fn vertex_range(&self) -> core::ops::Range<usize> {
		self.vertex_offset as usize..(self.vertex_offset + self.vertex_count) as usize
	}

	pub fn triangle_range(&self) -> core::ops::Range<usize> {
		self.triangle_offset as usize..(self.triangle_offset + self.triangle_count) as usize
	}
}

impl AsRef<MeshletData> for MeshletData {
	fn as_ref(&self) -> &MeshletData {
		self
	}
}

/// The 3 local vertex indices of a meshlet triangle packed into one word: vertex 0 in bits 0-7, vertex 1 in bits 8-15
/// and vertex 2 in bits 16-23.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct PackedTriangle(pub u32);
const_assert_eq!(size_of::<PackedTriangle>(), 4);
static_assertions::const_assert!(MESHLET_MAX_VERTICES - 1 <= PACKED_INDEX_MASK);

impl PackedTriangle {
	pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
		let f = |i: u32, v: u32| {
			assert_eq!(
				v & PACKED_INDEX_MASK,
				v,
				"local index {} is too large for {} bits",
				v,
				PACKED_INDEX_BITS
			);
			v << (i * PACKED_INDEX_BITS)
		};
		Self(f(0, v0) | f(1, v1) | f(2, v2))
	}

	pub fn from_values(values: [u32; 3]) -> Self {
		Self::new(values[0], values[1], values[2])
	}

	pub fn to_values(&self) -> [u32; 3] {
		let f = |i: u32| (self.0 >> (i * PACKED_INDEX_BITS)) & PACKED_INDEX_MASK;
		[f(0), f(1), f(2)]
	}

	pub fn to_uvec3(&self) -> UVec3 {
		UVec3::from_array(self.to_values())
	}
}

impl Debug for PackedTriangle {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		for i in self.to_values() {
			write!(f, "{:4}", i)?;
		}
		Ok(())
	}
}
