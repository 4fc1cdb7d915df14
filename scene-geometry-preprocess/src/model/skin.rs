use crate::gltf::Gltf;
use crate::model::node::NodeId;
use glam::Mat4;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
pub struct Skin {
	pub name: Option<String>,
	pub skeleton_root: Option<NodeId>,
	pub joints: Vec<NodeId>,
	/// parallel to `joints`, identity if the skin has none
	pub inverse_bind_matrices: Vec<Mat4>,
}

/// Loads a skin, resolving its joints through `node_map` from source node index to loaded node.
#[profiling::function]
pub fn load_skin(gltf: &Gltf, skin: gltf::Skin, node_map: &FxHashMap<usize, NodeId>) -> Skin {
	let inverse_bind = skin
		.reader(|b| gltf.buffer(b))
		.read_inverse_bind_matrices()
		.map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect::<Vec<_>>())
		.unwrap_or_default();

	let mut joints = Vec::new();
	let mut inverse_bind_matrices = Vec::new();
	for (i, joint) in skin.joints().enumerate() {
		match node_map.get(&joint.index()) {
			Some(&id) => {
				joints.push(id);
				inverse_bind_matrices.push(inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY));
			}
			None => log::warn!(
				"skin {} references joint node {} which is not part of the scene, skipping it",
				skin.index(),
				joint.index()
			),
		}
	}

	Skin {
		name: skin.name().map(str::to_string),
		skeleton_root: skin.skeleton().and_then(|n| node_map.get(&n.index()).copied()),
		joints,
		inverse_bind_matrices,
	}
}
