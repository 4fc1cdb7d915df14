use glam::{Mat4, Quat, Vec3};
use gltf::scene::Transform;
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MeshId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SkinId(pub u32);

#[derive(Clone, Debug)]
pub struct Node {
	pub name: Option<String>,
	/// index of the node in the source document
	pub source_index: usize,
	pub parent: Option<NodeId>,
	pub children: SmallVec<[NodeId; 4]>,
	pub translation: Vec3,
	pub rotation: Quat,
	pub scale: Vec3,
	/// raw matrix applied after translation, rotation and scale
	pub matrix: Mat4,
	pub mesh: Option<MeshId>,
	pub skin: Option<SkinId>,
}

impl Node {
	pub fn from_gltf(node: &gltf::Node, parent: Option<NodeId>) -> Self {
		let (translation, rotation, scale, matrix) = match node.transform() {
			Transform::Matrix { matrix } => (Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, Mat4::from_cols_array_2d(&matrix)),
			Transform::Decomposed {
				translation,
				rotation,
				scale,
			} => (
				Vec3::from(translation),
				Quat::from_array(rotation),
				Vec3::from(scale),
				Mat4::IDENTITY,
			),
		};
		Self {
			name: node.name().map(str::to_string),
			source_index: node.index(),
			parent,
			children: SmallVec::new(),
			translation,
			rotation,
			scale,
			matrix,
			mesh: None,
			skin: node.skin().map(|s| SkinId(s.index() as u32)),
		}
	}

	pub fn local_matrix(&self) -> Mat4 {
		Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation) * self.matrix
	}
}
