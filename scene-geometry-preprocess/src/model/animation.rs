use crate::gltf::Gltf;
use crate::model::node::NodeId;
use glam::{Quat, Vec3, Vec4};
use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation, Property};
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelPath {
	Translation,
	Rotation,
	Scale,
}

#[derive(Clone, Debug)]
pub struct AnimationSampler {
	pub interpolation: Interpolation,
	pub inputs: Vec<f32>,
	/// translations and scales leave `w` at 0, rotations are `xyzw` quaternions. Cubic spline samplers store
	/// in-tangent, value and out-tangent per keyframe.
	pub outputs: Vec<Vec4>,
}

#[derive(Clone, Debug)]
pub struct AnimationChannel {
	pub path: ChannelPath,
	pub node: NodeId,
	pub sampler: usize,
}

#[derive(Clone, Debug)]
pub struct Animation {
	pub name: Option<String>,
	pub samplers: Vec<AnimationSampler>,
	pub channels: Vec<AnimationChannel>,
	pub start: f32,
	pub end: f32,
}

/// Loads an animation. Channels targeting morph weights, nodes outside the scene or with unreadable data are skipped.
#[profiling::function]
pub fn load_animation(gltf: &Gltf, animation: gltf::Animation, node_map: &FxHashMap<usize, NodeId>) -> Animation {
	let mut samplers = Vec::new();
	let mut channels = Vec::new();
	let mut start = f32::INFINITY;
	let mut end = f32::NEG_INFINITY;

	for channel in animation.channels() {
		let target = channel.target();
		let path = match target.property() {
			Property::Translation => ChannelPath::Translation,
			Property::Rotation => ChannelPath::Rotation,
			Property::Scale => ChannelPath::Scale,
			Property::MorphTargetWeights => {
				log::warn!(
					"animation {}: weights channels are not supported, skipping",
					animation.index()
				);
				continue;
			}
		};
		let Some(&node) = node_map.get(&target.node().index()) else {
			log::warn!(
				"animation {}: channel targets node {} which is not part of the scene, skipping",
				animation.index(),
				target.node().index()
			);
			continue;
		};

		let reader = channel.reader(|b| gltf.buffer(b));
		let Some(inputs) = reader.read_inputs().map(|i| i.collect::<Vec<_>>()) else {
			log::warn!("animation {}: channel without inputs, skipping", animation.index());
			continue;
		};
		let outputs = match reader.read_outputs() {
			Some(ReadOutputs::Translations(iter)) => iter.map(|v| Vec3::from(v).extend(0.)).collect::<Vec<_>>(),
			Some(ReadOutputs::Rotations(iter)) => iter.into_f32().map(Vec4::from).collect(),
			Some(ReadOutputs::Scales(iter)) => iter.map(|v| Vec3::from(v).extend(0.)).collect(),
			Some(ReadOutputs::MorphTargetWeights(_)) | None => {
				log::warn!("animation {}: unsupported output type, skipping", animation.index());
				continue;
			}
		};

		if let (Some(first), Some(last)) = (inputs.first(), inputs.last()) {
			start = start.min(*first);
			end = end.max(*last);
		}
		channels.push(AnimationChannel {
			path,
			node,
			sampler: samplers.len(),
		});
		samplers.push(AnimationSampler {
			interpolation: channel.sampler().interpolation(),
			inputs,
			outputs,
		});
	}

	if channels.is_empty() {
		start = 0.;
		end = 0.;
	}
	Animation {
		name: animation.name().map(str::to_string),
		samplers,
		channels,
		start,
		end,
	}
}

impl AnimationSampler {
	fn value(&self, key: usize) -> Vec4 {
		match self.interpolation {
			Interpolation::CubicSpline => self.outputs[key * 3 + 1],
			_ => self.outputs[key],
		}
	}

	/// Samples the keyframes at `time`, or `None` if `time` lies outside the keyframes or data is missing.
	pub fn sample(&self, time: f32, path: ChannelPath) -> Option<Vec4> {
		let keys = match self.interpolation {
			Interpolation::CubicSpline => self.outputs.len() / 3,
			_ => self.outputs.len(),
		};
		let keys = keys.min(self.inputs.len());
		if keys == 0 {
			return None;
		}
		if keys == 1 {
			return (time == self.inputs[0]).then(|| self.value(0));
		}

		let i = (0..keys - 1).find(|&i| time >= self.inputs[i] && time <= self.inputs[i + 1])?;
		let (t0, t1) = (self.inputs[i], self.inputs[i + 1]);
		let dt = t1 - t0;
		let u = if dt > 0. { ((time - t0) / dt).clamp(0., 1.) } else { 0. };

		let value = match self.interpolation {
			Interpolation::Step => self.value(i),
			Interpolation::Linear => {
				let (a, b) = (self.value(i), self.value(i + 1));
				match path {
					ChannelPath::Rotation => Vec4::from(Quat::from_vec4(a).slerp(Quat::from_vec4(b), u)),
					_ => a.lerp(b, u),
				}
			}
			Interpolation::CubicSpline => {
				let p0 = self.value(i);
				let m0 = self.outputs[i * 3 + 2] * dt;
				let p1 = self.value(i + 1);
				let m1 = self.outputs[(i + 1) * 3] * dt;
				let u2 = u * u;
				let u3 = u2 * u;
				p0 * (2. * u3 - 3. * u2 + 1.) + m0 * (u3 - 2. * u2 + u) + p1 * (-2. * u3 + 3. * u2) + m1 * (u3 - u2)
			}
		};
		Some(match path {
			ChannelPath::Rotation => value.normalize_or_zero(),
			_ => value,
		})
	}
}
