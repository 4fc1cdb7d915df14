use bytemuck_derive::{Pod, Zeroable};
use core::mem::size_of;
use glam::{Mat4, Vec3};
use static_assertions::{const_assert, const_assert_eq};

pub const CLUSTER_MAX_VERTICES: u32 = 64;
pub const CLUSTER_MAX_TRIANGLES: u32 = 64;
/// spatial clustering may not go below this many triangles per cluster, must be a multiple of 4
pub const CLUSTER_MIN_TRIANGLES: u32 = (CLUSTER_MAX_TRIANGLES / 4) & !3;
/// clusters with large bounds above the min triangle floor get split by this factor
pub const CLUSTER_FILL_WEIGHT: f32 = 0.5;
/// negative to prefer axis aligned clusters, which suit ray tracing better than cone culling
pub const CLUSTER_CONE_WEIGHT: f32 = -1.;
const_assert!(CLUSTER_MAX_VERTICES <= 255);
const_assert_eq!(CLUSTER_MIN_TRIANGLES % 4, 0);
const_assert_eq!(CLUSTER_MAX_TRIANGLES % 4, 0);

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct ClusterData {
	pub num_vertices: u16,
	pub num_triangles: u16,
	/// triangle index into the global index buffer, the cluster occupies indices
	/// `3 * first_triangle .. 3 * (first_triangle + num_triangles)`
	pub first_triangle: u32,
	/// first entry in the cluster-local-vertex array
	pub first_local_vertex: u32,
	/// first triangle in the cluster-local-index array, which stores 3 bytes per triangle
	pub first_local_triangle: u32,
}
const_assert_eq!(size_of::<ClusterData>(), 16);

impl ClusterData {
	pub fn local_vertex_range(&self) -> core::ops::Range<usize> {
		let start = self.first_local_vertex as usize;
		start..start + self.num_vertices as usize
	}

	pub fn local_index_range(&self) -> core::ops::Range<usize> {
		let start = self.first_local_triangle as usize * 3;
		start..start + self.num_triangles as usize * 3
	}

	pub fn global_index_range(&self) -> core::ops::Range<usize> {
		let start = self.first_triangle as usize * 3;
		start..start + self.num_triangles as usize * 3
	}
}

/// An axis aligned bounding box. A default box is empty and becomes valid once a point is added.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct BBox {
	pub min: Vec3,
	pub max: Vec3,
}
const_assert_eq!(size_of::<BBox>(), 24);

impl Default for BBox {
	fn default() -> Self {
		Self::EMPTY
	}
}

impl BBox {
	pub const EMPTY: Self = Self {
		min: Vec3::INFINITY,
		max: Vec3::NEG_INFINITY,
	};

	pub fn new(min: Vec3, max: Vec3) -> Self {
		Self { min, max }
	}

	pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
		points.into_iter().fold(Self::EMPTY, Self::extend)
	}

	pub fn extend(self, point: Vec3) -> Self {
		Self {
			min: self.min.min(point),
			max: self.max.max(point),
		}
	}

	pub fn union(self, other: Self) -> Self {
		Self {
			min: self.min.min(other.min),
			max: self.max.max(other.max),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.min.cmpgt(self.max).any()
	}

	/// inclusive on both ends
	pub fn contains(&self, point: Vec3) -> bool {
		self.min.cmple(point).all() && point.cmple(self.max).all()
	}

	pub fn contains_bbox(&self, other: &BBox) -> bool {
		self.contains(other.min) && self.contains(other.max)
	}

	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// bounds of all 8 corners after transformation
	pub fn transformed(&self, matrix: Mat4) -> Self {
		if self.is_empty() {
			return *self;
		}
		(0..8)
			.map(|i| {
				Vec3::new(
					if i & 1 == 0 { self.min.x } else { self.max.x },
					if i & 2 == 0 { self.min.y } else { self.max.y },
					if i & 4 == 0 { self.min.z } else { self.max.z },
				)
			})
			.map(|corner| matrix.transform_point3(corner))
			.fold(Self::EMPTY, Self::extend)
	}
}
