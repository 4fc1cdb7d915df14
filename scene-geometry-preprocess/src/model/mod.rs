pub mod animation;
pub mod material;
pub mod node;
pub mod post;
pub mod skin;
pub mod update;

mod disk;

use crate::cluster::build_clusters;
use crate::error::SceneError;
use crate::flags::{LoadConfig, LoadFlags};
use crate::flatten::Flattener;
use crate::gltf::Gltf;
use crate::meshlet::build_meshlets;
use crate::model::animation::{Animation, load_animation};
use crate::model::material::{load_image_ref, load_material};
use crate::model::node::{MeshId, Node, NodeId};
use crate::model::post::Dimensions;
use crate::model::skin::{Skin, load_skin};
use anyhow::Context;
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use scene_geometry_disk::cluster::ClusterBuffers;
use scene_geometry_disk::material::{ImageRef, MaterialData};
use scene_geometry_disk::meshlet::MeshletBuffers;
use scene_geometry_disk::primitive::PrimitiveData;
use scene_geometry_disk::range::RangeU32;
use scene_geometry_disk::vertex::{VertexBuffer, VertexLayout};
use scene_geometry_shader::uniform::MeshUniform;
use std::ops::{Index, IndexMut};
use std::path::Path;

/// A mesh instanced by exactly one node.
#[derive(Clone, Debug)]
pub struct Mesh {
	pub name: Option<String>,
	pub node: NodeId,
	pub primitives: RangeU32,
	pub uniform: MeshUniform,
}

/// A scene flattened into global vertex and index arrays, with its node hierarchy kept in an arena.
pub struct Model {
	pub config: LoadConfig,
	pub nodes: Vec<Node>,
	pub roots: Vec<NodeId>,
	/// all nodes, children before their parent
	pub linear_nodes: Vec<NodeId>,
	pub meshes: Vec<Mesh>,
	pub skins: Vec<Skin>,
	pub animations: Vec<Animation>,
	/// the last material is the default material
	pub materials: Vec<MaterialData>,
	pub images: Vec<ImageRef>,
	pub vertices: VertexBuffer,
	pub indices: Vec<u32>,
	pub primitives: Vec<PrimitiveData>,
	pub meshlets: Option<MeshletBuffers>,
	pub clusters: Option<ClusterBuffers>,
	pub dimensions: Dimensions,
	pub metallic_roughness_workflow: bool,
	/// applied on top of every root node
	pub root_transform: Mat4,
}

impl Index<NodeId> for Model {
	type Output = Node;

	fn index(&self, index: NodeId) -> &Self::Output {
		&self.nodes[index.0 as usize]
	}
}

impl IndexMut<NodeId> for Model {
	fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
		&mut self.nodes[index.0 as usize]
	}
}

impl Index<MeshId> for Model {
	type Output = Mesh;

	fn index(&self, index: MeshId) -> &Self::Output {
		&self.meshes[index.0 as usize]
	}
}

struct NodeLoader<'a> {
	flattener: Flattener<'a>,
	nodes: Vec<Node>,
	linear_nodes: Vec<NodeId>,
	meshes: Vec<Mesh>,
	node_map: FxHashMap<usize, NodeId>,
	visited: Vec<bool>,
}

impl NodeLoader<'_> {
	/// Depth first, children are loaded before the node's own mesh.
	fn load_node(&mut self, node: gltf::Node, parent: Option<NodeId>) -> anyhow::Result<NodeId> {
		if std::mem::replace(&mut self.visited[node.index()], true) {
			Err(SceneError::NodeCycle { node: node.index() })?;
		}
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node::from_gltf(&node, parent));
		self.node_map.insert(node.index(), id);

		for child in node.children() {
			let child = self.load_node(child, Some(id))?;
			self.nodes[id.0 as usize].children.push(child);
		}

		if let Some(mesh) = node.mesh() {
			let primitives = self
				.flattener
				.flatten_mesh(mesh.clone())
				.with_context(|| format!("failed flattening mesh {} of node {}", mesh.index(), node.index()))?;
			let mesh_id = MeshId(self.meshes.len() as u32);
			self.meshes.push(Mesh {
				name: mesh.name().map(str::to_string),
				node: id,
				primitives,
				uniform: MeshUniform::default(),
			});
			self.nodes[id.0 as usize].mesh = Some(mesh_id);
		}

		self.linear_nodes.push(id);
		Ok(id)
	}
}

impl Model {
	pub fn load(path: &Path, config: LoadConfig) -> anyhow::Result<Self> {
		let gltf = Gltf::open(path).with_context(|| format!("opening gltf file failed {path:?}"))?;
		Self::from_gltf(&gltf, config)
	}

	/// Loads the document's default scene, or its first scene if none is marked as default.
	#[profiling::function]
	pub fn from_gltf(gltf: &Gltf, config: LoadConfig) -> anyhow::Result<Self> {
		config.validate()?;
		let scene = gltf
			.default_scene()
			.or_else(|| gltf.scenes().next())
			.ok_or(SceneError::NoScene)?;

		let load_images = !config.flags.contains(LoadFlags::DONT_LOAD_IMAGES);
		let mut materials = gltf
			.materials()
			.map(|material| load_material(material, load_images))
			.collect::<Vec<_>>();
		let default_material = materials.len() as u32;
		materials.push(MaterialData::default());
		let images = if load_images {
			gltf.images().map(load_image_ref).collect()
		} else {
			Vec::new()
		};

		let layout = if gltf.skins().next().is_some() {
			VertexLayout::Skinned
		} else {
			VertexLayout::Simple
		};
		let mut loader = NodeLoader {
			flattener: Flattener::new(gltf, layout, default_material),
			nodes: Vec::new(),
			linear_nodes: Vec::new(),
			meshes: Vec::new(),
			node_map: FxHashMap::default(),
			visited: vec![false; gltf.nodes().len()],
		};
		let roots = {
			profiling::scope!("load nodes");
			scene
				.nodes()
				.map(|node| loader.load_node(node, None))
				.collect::<anyhow::Result<Vec<_>>>()?
		};

		let skins = gltf
			.skins()
			.map(|skin| load_skin(gltf, skin, &loader.node_map))
			.collect();
		let animations = gltf
			.animations()
			.map(|animation| load_animation(gltf, animation, &loader.node_map))
			.collect();

		let NodeLoader {
			flattener,
			nodes,
			linear_nodes,
			meshes,
			..
		} = loader;
		let (vertices, indices, primitives) = flattener.finish();

		let mut model = Model {
			config,
			nodes,
			roots,
			linear_nodes,
			meshes,
			skins,
			animations,
			materials,
			images,
			vertices,
			indices,
			primitives,
			meshlets: None,
			clusters: None,
			dimensions: Dimensions::default(),
			metallic_roughness_workflow: gltf.metallic_roughness_workflow(),
			root_transform: Mat4::from_scale(Vec3::splat(config.scale)),
		};

		model.update_all();
		model.post_process();

		if config.flags.contains(LoadFlags::PREPARE_MESH_SHADER_PIPELINE) {
			model.meshlets = Some(build_meshlets(&model.vertices, &model.indices, &model.primitives)?);
		}
		if config.flags.contains(LoadFlags::MAKE_CLUSTERS) {
			model.clusters = Some(build_clusters(&model.vertices, &mut model.indices, &model.primitives)?);
		}

		log::debug!(
			"loaded {} nodes, {} meshes, {} primitives, {} vertices, {} indices",
			model.nodes.len(),
			model.meshes.len(),
			model.primitives.len(),
			model.vertices.len(),
			model.indices.len()
		);
		Ok(model)
	}

	pub fn mesh_primitives(&self, mesh: &Mesh) -> &[PrimitiveData] {
		&self.primitives[mesh.primitives.to_usize()]
	}
}
