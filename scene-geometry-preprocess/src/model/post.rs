use crate::flags::LoadFlags;
use crate::model::Model;
use glam::{Mat3, Vec3};
use scene_geometry_disk::cluster::BBox;

/// Axis aligned extent of the whole scene in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dimensions {
	pub min: Vec3,
	pub max: Vec3,
	pub size: Vec3,
	pub center: Vec3,
	pub radius: f32,
}

impl Dimensions {
	pub fn from_bbox(bbox: BBox) -> Self {
		if bbox.is_empty() {
			return Self::default();
		}
		Self {
			min: bbox.min,
			max: bbox.max,
			size: bbox.size(),
			center: bbox.center(),
			radius: bbox.min.distance(bbox.max) / 2.,
		}
	}
}

impl Model {
	/// Applies the vertex flags, optimizes vertex cache locality if requested and recomputes bounds and dimensions.
	#[profiling::function]
	pub fn post_process(&mut self) {
		let flags = self.config.flags;
		let pre_transform = flags.contains(LoadFlags::PRE_TRANSFORM_VERTICES);
		let flip_y = flags.contains(LoadFlags::FLIP_Y);
		let pre_multiply = flags.contains(LoadFlags::PRE_MULTIPLY_VERTEX_COLORS);

		if pre_transform || flip_y || pre_multiply {
			profiling::scope!("vertex flags");
			let matrices = self
				.meshes
				.iter()
				.map(|mesh| self.world_matrix(mesh.node))
				.collect::<Vec<_>>();
			for (mesh, matrix) in self.meshes.iter().zip(matrices) {
				let normal_matrix = Mat3::from_mat4(matrix);
				for primitive in &self.primitives[mesh.primitives.to_usize()] {
					let base_color = self.materials[primitive.material as usize].base_color_factor;
					self.vertices.for_each_mut(primitive.vertex_range(), |v| {
						if pre_transform {
							v.position = matrix.transform_point3(v.position);
							v.normal = (normal_matrix * v.normal).normalize_or_zero();
						}
						if flip_y {
							v.position.y = -v.position.y;
							v.normal.y = -v.normal.y;
						}
						if pre_multiply {
							v.color *= base_color;
						}
					});
				}
			}
		}

		if flags.contains(LoadFlags::OPTIMIZE_VERTEX_CACHE) {
			profiling::scope!("meshopt::optimize_vertex_cache");
			for primitive in &self.primitives {
				let indices = &mut self.indices[primitive.index_range()];
				indices.iter_mut().for_each(|i| *i -= primitive.first_vertex);
				meshopt::optimize_vertex_cache_in_place(indices, primitive.vertex_count as usize);
				indices.iter_mut().for_each(|i| *i += primitive.first_vertex);
			}
		}

		for primitive in &mut self.primitives {
			primitive.bounds = BBox::from_points(self.vertices.positions(primitive.vertex_range()));
		}
		self.dimensions = Dimensions::from_bbox(self.world_bounds());
	}

	/// bounds of all primitives transformed by their mesh's matrix
	pub fn world_bounds(&self) -> BBox {
		self.meshes
			.iter()
			.flat_map(|mesh| {
				self.primitives[mesh.primitives.to_usize()]
					.iter()
					.map(|p| p.bounds.transformed(mesh.uniform.matrix))
			})
			.fold(BBox::EMPTY, BBox::union)
	}
}
