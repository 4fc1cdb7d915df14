use crate::error::GeometryError;
use scene_geometry_disk::material::MaterialData;
use scene_geometry_disk::primitive::{MeshData, PrimitiveData};
use scene_geometry_disk::scene::{GeometryNodeGranularity, PreparedSceneDisk};
use scene_geometry_shader::geometry_node::{GeometryNodePerMesh, GeometryNodePerPrimitive, MeshPrimitive, texture_index};
use std::mem::size_of;

/// byte size of one entry in the global index buffer
pub const INDEX_SIZE: u64 = size_of::<u32>() as u64;

/// Device addresses of the scene's global vertex and index buffers.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GeometryAddresses {
	pub vertex_buffer: u64,
	pub index_buffer: u64,
}

/// The table shaders use to find the geometry and textures of a traced or shaded primitive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GeometryDescriptorTable {
	/// one record per primitive with a base color texture, in mesh order
	PerPrimitive(Vec<GeometryNodePerPrimitive>),
	/// one record per mesh, `primitives` holds one entry per primitive of all meshes
	PerMesh {
		meshes: Vec<GeometryNodePerMesh>,
		primitives: Vec<MeshPrimitive>,
	},
}

fn material_of<'a>(
	materials: &'a [MaterialData],
	index: usize,
	primitive: &PrimitiveData,
) -> Result<&'a MaterialData, GeometryError> {
	materials
		.get(primitive.material as usize)
		.ok_or(GeometryError::MaterialOutOfRange {
			primitive: index,
			material: primitive.material,
		})
}

impl GeometryDescriptorTable {
	/// Builds the table selected when the scene was prepared, `None` if no table was requested.
	pub fn build(scene: &PreparedSceneDisk, addresses: GeometryAddresses) -> Result<Option<Self>, GeometryError> {
		Ok(match scene.geometry_nodes {
			GeometryNodeGranularity::None => None,
			GeometryNodeGranularity::PerPrimitive => Some(Self::per_primitive(
				&scene.meshes,
				&scene.primitives,
				&scene.materials,
				addresses,
			)?),
			GeometryNodeGranularity::PerMesh => Some(Self::per_mesh(&scene.meshes, &scene.primitives, &scene.materials)?),
		})
	}

	#[profiling::function]
	pub fn per_primitive(
		meshes: &[MeshData],
		primitives: &[PrimitiveData],
		materials: &[MaterialData],
		addresses: GeometryAddresses,
	) -> Result<Self, GeometryError> {
		let mut nodes = Vec::with_capacity(primitives.len());
		for mesh in meshes {
			for index in mesh.primitives.to_usize() {
				let primitive = &primitives[index];
				let material = material_of(materials, index, primitive)?;
				let Some(base_color) = material.base_color_texture else {
					continue;
				};
				nodes.push(GeometryNodePerPrimitive {
					vertex_buffer_address: addresses.vertex_buffer,
					index_buffer_address: addresses.index_buffer + primitive.first_index as u64 * INDEX_SIZE,
					base_color_texture_index: texture_index(Some(base_color)),
					occlusion_texture_index: texture_index(material.occlusion_texture),
				});
			}
		}
		Ok(Self::PerPrimitive(nodes))
	}

	/// Offsets count vertices and indices, accumulated over all meshes in order.
	#[profiling::function]
	pub fn per_mesh(
		meshes: &[MeshData],
		primitives: &[PrimitiveData],
		materials: &[MaterialData],
	) -> Result<Self, GeometryError> {
		let mut mesh_nodes = Vec::with_capacity(meshes.len());
		let mut mesh_primitives = Vec::with_capacity(primitives.len());
		let mut vertex_start_offset = 0;
		let mut index_start_offset = 0;
		for mesh in meshes {
			mesh_nodes.push(GeometryNodePerMesh {
				vertex_start_offset,
				index_start_offset,
				primitive_start_offset: mesh_primitives.len() as u32,
			});

			let mut vertex_start_offset_in_mesh = 0;
			let mut index_start_offset_in_mesh = 0;
			for index in mesh.primitives.to_usize() {
				let primitive = &primitives[index];
				let material = material_of(materials, index, primitive)?;
				mesh_primitives.push(MeshPrimitive {
					vertex_start_offset_in_mesh,
					index_start_offset_in_mesh,
					base_color_texture_index: texture_index(material.base_color_texture),
					occlusion_texture_index: texture_index(material.occlusion_texture),
				});
				vertex_start_offset_in_mesh += primitive.vertex_count;
				index_start_offset_in_mesh += primitive.index_count;
			}
			vertex_start_offset += vertex_start_offset_in_mesh;
			index_start_offset += index_start_offset_in_mesh;
		}
		Ok(Self::PerMesh {
			meshes: mesh_nodes,
			primitives: mesh_primitives,
		})
	}

	pub fn granularity(&self) -> GeometryNodeGranularity {
		match self {
			Self::PerPrimitive(_) => GeometryNodeGranularity::PerPrimitive,
			Self::PerMesh { .. } => GeometryNodeGranularity::PerMesh,
		}
	}
}
