use crate::error::SceneError;
use bitflags::bitflags;
use scene_geometry_disk::scene::GeometryNodeGranularity;

bitflags! {
	#[repr(transparent)]
	#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
	pub struct LoadFlags: u32 {
		/// bake each node's world matrix into positions and normals
		const PRE_TRANSFORM_VERTICES = 1 << 0;
		/// multiply vertex colors by the material's base color factor
		const PRE_MULTIPLY_VERTEX_COLORS = 1 << 1;
		const FLIP_Y = 1 << 2;
		/// do not record the document's images
		const DONT_LOAD_IMAGES = 1 << 3;
		/// build meshlets for mesh shading
		const PREPARE_MESH_SHADER_PIPELINE = 1 << 4;
		/// build spatial clusters for cluster acceleration structures
		const MAKE_CLUSTERS = 1 << 5;
		const GEOMETRY_NODE_PER_PRIMITIVE = 1 << 6;
		const GEOMETRY_NODE_PER_MESH = 1 << 7;
		/// reorder each primitive's indices for vertex cache locality
		const OPTIMIZE_VERTEX_CACHE = 1 << 8;
	}
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadConfig {
	pub flags: LoadFlags,
	/// uniform scale applied to all scene root nodes
	pub scale: f32,
}

impl Default for LoadConfig {
	fn default() -> Self {
		Self {
			flags: LoadFlags::empty(),
			scale: 1.,
		}
	}
}

impl LoadConfig {
	pub fn new(flags: LoadFlags) -> Self {
		Self { flags, scale: 1. }
	}

	pub fn with_scale(self, scale: f32) -> Self {
		Self { scale, ..self }
	}

	pub fn validate(&self) -> Result<(), SceneError> {
		if self
			.flags
			.contains(LoadFlags::PREPARE_MESH_SHADER_PIPELINE | LoadFlags::MAKE_CLUSTERS)
		{
			return Err(SceneError::ConflictingFlags(
				"meshlets and clusters can not be built in the same load",
			));
		}
		if self
			.flags
			.contains(LoadFlags::GEOMETRY_NODE_PER_PRIMITIVE | LoadFlags::GEOMETRY_NODE_PER_MESH)
		{
			return Err(SceneError::ConflictingFlags(
				"geometry nodes can be either per primitive or per mesh",
			));
		}
		if !(self.scale.is_finite() && self.scale > 0.) {
			return Err(SceneError::InvalidScale { scale: self.scale });
		}
		Ok(())
	}

	pub fn geometry_nodes(&self) -> GeometryNodeGranularity {
		if self.flags.contains(LoadFlags::GEOMETRY_NODE_PER_PRIMITIVE) {
			GeometryNodeGranularity::PerPrimitive
		} else if self.flags.contains(LoadFlags::GEOMETRY_NODE_PER_MESH) {
			GeometryNodeGranularity::PerMesh
		} else {
			GeometryNodeGranularity::None
		}
	}
}
