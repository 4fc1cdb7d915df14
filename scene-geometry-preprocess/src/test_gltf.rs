//! Builds small glTF documents in memory, with all binary data in a single base64 data URI buffer.

use crate::gltf::Gltf;
use base64::Engine;
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde_json::{Value, json};

pub const FLOAT: u32 = 5126;
pub const UNSIGNED_BYTE: u32 = 5121;
pub const UNSIGNED_SHORT: u32 = 5123;
pub const UNSIGNED_INT: u32 = 5125;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Default)]
pub struct GltfBuilder {
	buffer: Vec<u8>,
	buffer_views: Vec<Value>,
	accessors: Vec<Value>,
	meshes: Vec<Value>,
	nodes: Vec<Value>,
	materials: Vec<Value>,
	images: Vec<Value>,
	textures: Vec<Value>,
	skins: Vec<Value>,
	animations: Vec<Value>,
	scenes: Vec<Value>,
	extensions_used: Vec<String>,
}

fn push(vec: &mut Vec<Value>, value: Value) -> usize {
	vec.push(value);
	vec.len() - 1
}

impl GltfBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	fn view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
		while self.buffer.len() % 4 != 0 {
			self.buffer.push(0);
		}
		let offset = self.buffer.len();
		self.buffer.extend_from_slice(bytes);
		let mut view = json!({
			"buffer": 0,
			"byteOffset": offset,
			"byteLength": bytes.len(),
		});
		if let Some(target) = target {
			view["target"] = json!(target);
		}
		push(&mut self.buffer_views, view)
	}

	pub fn accessor(&mut self, bytes: &[u8], component_type: u32, count: usize, ty: &str, target: Option<u32>) -> usize {
		let view = self.view(bytes, target);
		push(
			&mut self.accessors,
			json!({
				"bufferView": view,
				"componentType": component_type,
				"count": count,
				"type": ty,
			}),
		)
	}

	fn min_max(&mut self, accessor: usize, min: &[f32], max: &[f32]) {
		self.accessors[accessor]["min"] = json!(min);
		self.accessors[accessor]["max"] = json!(max);
	}

	pub fn positions(&mut self, positions: &[Vec3]) -> usize {
		let bytes = positions.iter().flat_map(|p| p.to_array()).collect::<Vec<f32>>();
		let accessor = self.accessor(&float_bytes(&bytes), FLOAT, positions.len(), "VEC3", Some(ARRAY_BUFFER));
		let min = positions.iter().copied().fold(Vec3::INFINITY, Vec3::min);
		let max = positions.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
		self.min_max(accessor, &min.to_array(), &max.to_array());
		accessor
	}

	pub fn vec3s(&mut self, values: &[Vec3]) -> usize {
		let bytes = values.iter().flat_map(|p| p.to_array()).collect::<Vec<f32>>();
		self.accessor(&float_bytes(&bytes), FLOAT, values.len(), "VEC3", Some(ARRAY_BUFFER))
	}

	pub fn vec4s(&mut self, values: &[Vec4]) -> usize {
		let bytes = values.iter().flat_map(|p| p.to_array()).collect::<Vec<f32>>();
		self.accessor(&float_bytes(&bytes), FLOAT, values.len(), "VEC4", Some(ARRAY_BUFFER))
	}

	pub fn vec2s(&mut self, values: &[Vec2]) -> usize {
		let bytes = values.iter().flat_map(|p| p.to_array()).collect::<Vec<f32>>();
		self.accessor(&float_bytes(&bytes), FLOAT, values.len(), "VEC2", Some(ARRAY_BUFFER))
	}

	pub fn joints(&mut self, values: &[[u16; 4]]) -> usize {
		let bytes = values
			.iter()
			.flatten()
			.flat_map(|j| j.to_le_bytes())
			.collect::<Vec<u8>>();
		self.accessor(&bytes, UNSIGNED_SHORT, values.len(), "VEC4", Some(ARRAY_BUFFER))
	}

	pub fn scalars(&mut self, values: &[f32]) -> usize {
		let accessor = self.accessor(&float_bytes(values), FLOAT, values.len(), "SCALAR", None);
		let min = values.iter().copied().fold(f32::INFINITY, f32::min);
		let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
		self.min_max(accessor, &[min], &[max]);
		accessor
	}

	pub fn mat4s(&mut self, values: &[Mat4]) -> usize {
		let bytes = values.iter().flat_map(|m| m.to_cols_array()).collect::<Vec<f32>>();
		self.accessor(&float_bytes(&bytes), FLOAT, values.len(), "MAT4", None)
	}

	pub fn indices_u8(&mut self, indices: &[u8]) -> usize {
		self.accessor(indices, UNSIGNED_BYTE, indices.len(), "SCALAR", Some(ELEMENT_ARRAY_BUFFER))
	}

	pub fn indices_u16(&mut self, indices: &[u16]) -> usize {
		let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect::<Vec<u8>>();
		self.accessor(&bytes, UNSIGNED_SHORT, indices.len(), "SCALAR", Some(ELEMENT_ARRAY_BUFFER))
	}

	pub fn indices_u32(&mut self, indices: &[u32]) -> usize {
		let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect::<Vec<u8>>();
		self.accessor(&bytes, UNSIGNED_INT, indices.len(), "SCALAR", Some(ELEMENT_ARRAY_BUFFER))
	}

	/// A triangle list primitive with only positions and optional indices, extend `attributes` for more.
	pub fn primitive(position: usize, indices: Option<usize>) -> Value {
		let mut primitive = json!({
			"attributes": { "POSITION": position },
		});
		if let Some(indices) = indices {
			primitive["indices"] = json!(indices);
		}
		primitive
	}

	pub fn mesh(&mut self, primitives: Vec<Value>) -> usize {
		push(&mut self.meshes, json!({ "primitives": primitives }))
	}

	pub fn node(&mut self, node: Value) -> usize {
		push(&mut self.nodes, node)
	}

	pub fn material(&mut self, material: Value) -> usize {
		push(&mut self.materials, material)
	}

	/// Adds an image referenced by uri and a texture sampling it, returning the texture index.
	pub fn texture(&mut self) -> usize {
		let image_uri = format!("image{}.png", self.images.len());
		let image = push(&mut self.images, json!({ "uri": image_uri }));
		push(&mut self.textures, json!({ "source": image }))
	}

	pub fn skin(&mut self, skin: Value) -> usize {
		push(&mut self.skins, skin)
	}

	pub fn animation(&mut self, animation: Value) -> usize {
		push(&mut self.animations, animation)
	}

	pub fn scene(&mut self, roots: &[usize]) -> usize {
		push(&mut self.scenes, json!({ "nodes": roots }))
	}

	pub fn extension_used(&mut self, extension: &str) {
		self.extensions_used.push(extension.to_string());
	}

	pub fn to_json(&self) -> Value {
		let mut root = json!({
			"asset": { "version": "2.0" },
		});
		if !self.buffer.is_empty() {
			let uri = format!(
				"data:application/octet-stream;base64,{}",
				base64::prelude::BASE64_STANDARD.encode(&self.buffer)
			);
			root["buffers"] = json!([{ "byteLength": self.buffer.len(), "uri": uri }]);
		}
		let mut optional = |key: &str, values: &Vec<Value>| {
			if !values.is_empty() {
				root[key] = json!(values);
			}
		};
		optional("bufferViews", &self.buffer_views);
		optional("accessors", &self.accessors);
		optional("meshes", &self.meshes);
		optional("nodes", &self.nodes);
		optional("materials", &self.materials);
		optional("images", &self.images);
		optional("textures", &self.textures);
		optional("skins", &self.skins);
		optional("animations", &self.animations);
		optional("scenes", &self.scenes);
		if !self.scenes.is_empty() {
			root["scene"] = json!(0);
		}
		if !self.extensions_used.is_empty() {
			root["extensionsUsed"] = json!(self.extensions_used);
		}
		root
	}

	pub fn build(&self) -> Gltf {
		let bytes = serde_json::to_vec(&self.to_json()).unwrap();
		Gltf::from_slice(&bytes).unwrap()
	}
}

fn float_bytes(floats: &[f32]) -> Vec<u8> {
	floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// A grid of `cols * rows` vertices spanning `size` in x and y, with the first `triangles` triangles of its quads.
pub fn grid(cols: u32, rows: u32, size: f32, triangles: usize) -> (Vec<Vec3>, Vec<u32>) {
	let positions = (0..rows)
		.flat_map(|y| {
			(0..cols).map(move |x| {
				Vec3::new(
					x as f32 / (cols - 1) as f32 * size,
					y as f32 / (rows - 1) as f32 * size,
					0.,
				)
			})
		})
		.collect::<Vec<_>>();
	let indices = (0..rows - 1)
		.flat_map(|y| (0..cols - 1).map(move |x| (x, y)))
		.flat_map(|(x, y)| {
			let i = y * cols + x;
			[i, i + 1, i + cols, i + 1, i + cols + 1, i + cols]
		})
		.take(triangles * 3)
		.collect::<Vec<_>>();
	assert_eq!(indices.len(), triangles * 3, "grid too small for {triangles} triangles");
	(positions, indices)
}

/// A single root node with one mesh made of the given primitives.
pub fn single_mesh_scene(builder: &mut GltfBuilder, primitives: Vec<Value>) -> usize {
	let mesh = builder.mesh(primitives);
	let node = builder.node(json!({ "mesh": mesh }));
	builder.scene(&[node]);
	node
}

/// A tessellated unit cube scaled to `[0, size]^3`, in which many triangles do not share a plane.
pub fn cube(subdivisions: u32, size: f32) -> (Vec<Vec3>, Vec<u32>) {
	let n = subdivisions + 1;
	let faces: [(Vec3, Vec3, Vec3); 6] = [
		(Vec3::ZERO, Vec3::X, Vec3::Y),
		(Vec3::Z, Vec3::Y, Vec3::X),
		(Vec3::ZERO, Vec3::Y, Vec3::Z),
		(Vec3::X, Vec3::Z, Vec3::Y),
		(Vec3::ZERO, Vec3::Z, Vec3::X),
		(Vec3::Y, Vec3::X, Vec3::Z),
	];
	let mut positions = Vec::new();
	let mut indices = Vec::new();
	for (origin, u, v) in faces {
		let base = positions.len() as u32;
		for y in 0..n {
			for x in 0..n {
				let p = origin + u * (x as f32 / subdivisions as f32) + v * (y as f32 / subdivisions as f32);
				positions.push(p * size);
			}
		}
		for y in 0..subdivisions {
			for x in 0..subdivisions {
				let i = base + y * n + x;
				indices.extend([i, i + 1, i + n, i + 1, i + n + 1, i + n]);
			}
		}
	}
	(positions, indices)
}

/// Rotates each triangle so its smallest index comes first, keeping winding, and sorts them.
pub fn canonical_triangles(triangles: impl IntoIterator<Item = [u32; 3]>) -> Vec<[u32; 3]> {
	let mut out = triangles
		.into_iter()
		.map(|t| {
			let min = (0..3).min_by_key(|&i| t[i]).unwrap_or(0);
			[t[min], t[(min + 1) % 3], t[(min + 2) % 3]]
		})
		.collect::<Vec<_>>();
	out.sort_unstable();
	out
}

pub fn triangles_of(indices: &[u32]) -> impl Iterator<Item = [u32; 3]> + '_ {
	indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
}
