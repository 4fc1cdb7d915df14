use glam::Vec3;
use rkyv::{Archive, Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Copy, Clone, Debug, PartialEq, Archive, Serialize, Deserialize)]
pub struct SceneStats {
	pub meshes: u32,
	pub primitives: u32,
	pub vertices: u32,
	pub indices: u32,
	pub triangles: u32,
	pub meshlets: u32,
	/// vertices may be referenced by multiple meshlets
	pub meshlet_vertices: u32,
	pub clusters: u32,
	pub bounds_min: Vec3,
	pub bounds_max: Vec3,
}

impl Default for SceneStats {
	fn default() -> Self {
		Self {
			meshes: 0,
			primitives: 0,
			vertices: 0,
			indices: 0,
			triangles: 0,
			meshlets: 0,
			meshlet_vertices: 0,
			clusters: 0,
			bounds_min: Vec3::INFINITY,
			bounds_max: Vec3::NEG_INFINITY,
		}
	}
}

impl Add for SceneStats {
	type Output = SceneStats;

	fn add(self, rhs: Self) -> Self::Output {
		Self {
			meshes: self.meshes + rhs.meshes,
			primitives: self.primitives + rhs.primitives,
			vertices: self.vertices + rhs.vertices,
			indices: self.indices + rhs.indices,
			triangles: self.triangles + rhs.triangles,
			meshlets: self.meshlets + rhs.meshlets,
			meshlet_vertices: self.meshlet_vertices + rhs.meshlet_vertices,
			clusters: self.clusters + rhs.clusters,
			bounds_min: self.bounds_min.min(rhs.bounds_min),
			bounds_max: self.bounds_max.max(rhs.bounds_max),
		}
	}
}

impl AddAssign for SceneStats {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl Sum for SceneStats {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Self::default(), |acc, x| acc + x)
	}
}
