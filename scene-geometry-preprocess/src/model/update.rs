use crate::error::SceneError;
use crate::flags::LoadFlags;
use crate::model::Model;
use crate::model::animation::ChannelPath;
use crate::model::node::{MeshId, NodeId};
use glam::{Mat4, Quat};
use scene_geometry_shader::uniform::MAX_NUM_JOINTS;

impl Model {
	/// world matrix of a node, including [`Model::root_transform`]
	pub fn world_matrix(&self, node: NodeId) -> Mat4 {
		let mut matrix = self[node].local_matrix();
		let mut parent = self[node].parent;
		while let Some(p) = parent {
			matrix = self[p].local_matrix() * matrix;
			parent = self[p].parent;
		}
		self.root_transform * matrix
	}

	/// Recomputes the uniform block of a node's mesh: its world matrix and, if skinned, its joint matrices.
	///
	/// With [`LoadFlags::PRE_TRANSFORM_VERTICES`] the world matrix is already baked into the vertices, so the
	/// uniform matrix stays identity.
	pub fn update_node(&mut self, node: NodeId) {
		let Some(mesh) = self[node].mesh else {
			return;
		};
		let world = self.world_matrix(node);
		let baked = self.config.flags.contains(LoadFlags::PRE_TRANSFORM_VERTICES);
		let joints = self[node].skin.and_then(|skin| self.skins.get(skin.0 as usize)).map(|skin| {
			if skin.joints.len() > MAX_NUM_JOINTS {
				log::warn!(
					"skin has {} joints, only the first {} are used",
					skin.joints.len(),
					MAX_NUM_JOINTS
				);
			}
			let inverse = world.inverse();
			skin.joints
				.iter()
				.zip(&skin.inverse_bind_matrices)
				.take(MAX_NUM_JOINTS)
				.map(|(&joint, inverse_bind)| inverse * self.world_matrix(joint) * *inverse_bind)
				.collect::<Vec<_>>()
		});

		let uniform = &mut self.meshes[mesh.0 as usize].uniform;
		uniform.matrix = if baked { Mat4::IDENTITY } else { world };
		if let Some(joints) = joints {
			uniform.joint_matrices[..joints.len()].copy_from_slice(&joints);
			uniform.joint_count = joints.len() as u32;
		}
	}

	pub fn update_all(&mut self) {
		profiling::scope!("Model::update_all");
		for i in 0..self.meshes.len() {
			let node = self[MeshId(i as u32)].node;
			self.update_node(node);
		}
	}

	/// Poses all nodes targeted by an animation at `time` and updates all mesh uniforms. Channels whose keyframes do
	/// not cover `time` leave their node untouched.
	#[profiling::function]
	pub fn update_animation(&mut self, index: usize, time: f32) -> Result<(), SceneError> {
		let animation = self
			.animations
			.get(index)
			.ok_or(SceneError::UnknownAnimation { index })?;

		let updates = animation
			.channels
			.iter()
			.filter_map(|channel| {
				let value = animation.samplers[channel.sampler].sample(time, channel.path)?;
				Some((channel.node, channel.path, value))
			})
			.collect::<Vec<_>>();
		if updates.is_empty() {
			return Ok(());
		}

		for (node, path, value) in updates {
			let node = &mut self[node];
			match path {
				ChannelPath::Translation => node.translation = value.truncate(),
				ChannelPath::Rotation => node.rotation = Quat::from_vec4(value).normalize(),
				ChannelPath::Scale => node.scale = value.truncate(),
			}
		}
		self.update_all();
		Ok(())
	}
}
