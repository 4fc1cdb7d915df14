use crate::descriptor::{GeometryAddresses, INDEX_SIZE};
use crate::error::GeometryError;
use ash::vk;
use bytemuck_derive::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use scene_geometry_disk::cluster::ClusterBuffers;
use scene_geometry_disk::material::{AlphaMode, MaterialData};
use scene_geometry_disk::primitive::{MeshData, PrimitiveData};
use scene_geometry_disk::scene::PreparedSceneDisk;
use scene_geometry_disk::vertex::VertexBuffer;
use static_assertions::const_assert_eq;
use std::ffi::CStr;
use std::mem::size_of;

pub const CLUSTER_ACCELERATION_STRUCTURE_NAME: &CStr = c"VK_NV_cluster_acceleration_structure";

/// Ray tracing features of a device, resolved once when it is created.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RayTracingCapabilities {
	pub acceleration_structure: bool,
	pub ray_query: bool,
	pub ray_tracing_pipeline: bool,
	pub cluster_acceleration_structure: bool,
}

impl RayTracingCapabilities {
	pub const NONE: Self = Self {
		acceleration_structure: false,
		ray_query: false,
		ray_tracing_pipeline: false,
		cluster_acceleration_structure: false,
	};

	pub fn from_extensions<'a>(extensions: impl IntoIterator<Item = &'a CStr>) -> Self {
		extensions.into_iter().fold(Self::NONE, |mut caps, ext| {
			if ext == ash::khr::acceleration_structure::NAME {
				caps.acceleration_structure = true;
			} else if ext == ash::khr::ray_query::NAME {
				caps.ray_query = true;
			} else if ext == ash::khr::ray_tracing_pipeline::NAME {
				caps.ray_tracing_pipeline = true;
			} else if ext == CLUSTER_ACCELERATION_STRUCTURE_NAME {
				caps.cluster_acceleration_structure = true;
			}
			caps
		})
	}

	/// acceleration structures can be built and traced by some pipeline
	pub fn ray_tracing(&self) -> bool {
		self.acceleration_structure && (self.ray_query || self.ray_tracing_pipeline)
	}

	pub fn clusters(&self) -> bool {
		self.ray_tracing() && self.cluster_acceleration_structure
	}

	/// usage for buffers read by acceleration structure builds
	pub fn build_input_usage(&self) -> vk::BufferUsageFlags {
		if self.ray_tracing() {
			vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS
				| vk::BufferUsageFlags::ACCELERATION_STRUCTURE_BUILD_INPUT_READ_ONLY_KHR
		} else {
			vk::BufferUsageFlags::empty()
		}
	}
}

pub const TRANSFORM_SIZE: u64 = size_of::<[f32; 12]>() as u64;

/// Row major 3x4 matrix as acceleration structures expect it.
pub fn transform_rows(matrix: Mat4) -> [f32; 12] {
	let rows = matrix.transpose().to_cols_array();
	std::array::from_fn(|i| rows[i])
}

pub fn transform_matrix(matrix: Mat4) -> vk::TransformMatrixKHR {
	vk::TransformMatrixKHR {
		matrix: transform_rows(matrix),
	}
}

/// One transform per mesh, addressed by [`TriangleGeometry::transform_offset`].
pub fn mesh_transforms(meshes: &[MeshData]) -> Vec<[f32; 12]> {
	meshes.iter().map(|mesh| transform_rows(mesh.transform)).collect()
}

fn opaque(materials: &[MaterialData], primitive: &PrimitiveData) -> bool {
	materials
		.get(primitive.material as usize)
		.is_none_or(|m| m.alpha_mode == AlphaMode::Opaque)
}

/// Bottom level triangle geometry of one primitive.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TriangleGeometry {
	pub vertex_address: u64,
	pub vertex_stride: u64,
	/// highest global vertex id the primitive's indices reference
	pub max_vertex: u32,
	/// already offset to the primitive's first index
	pub index_address: u64,
	pub triangle_count: u32,
	/// byte offset into the transform buffer
	pub transform_offset: u32,
	pub opaque: bool,
}

impl TriangleGeometry {
	pub fn to_vk(&self, transform_address: u64) -> vk::AccelerationStructureGeometryKHR<'static> {
		let triangles = vk::AccelerationStructureGeometryTrianglesDataKHR::default()
			.vertex_format(vk::Format::R32G32B32_SFLOAT)
			.vertex_data(vk::DeviceOrHostAddressConstKHR {
				device_address: self.vertex_address,
			})
			.vertex_stride(self.vertex_stride)
			.max_vertex(self.max_vertex)
			.index_type(vk::IndexType::UINT32)
			.index_data(vk::DeviceOrHostAddressConstKHR {
				device_address: self.index_address,
			})
			.transform_data(vk::DeviceOrHostAddressConstKHR {
				device_address: transform_address,
			});
		vk::AccelerationStructureGeometryKHR::default()
			.geometry_type(vk::GeometryTypeKHR::TRIANGLES)
			.geometry(vk::AccelerationStructureGeometryDataKHR { triangles })
			.flags(if self.opaque {
				vk::GeometryFlagsKHR::OPAQUE
			} else {
				vk::GeometryFlagsKHR::NO_DUPLICATE_ANY_HIT_INVOCATION
			})
	}

	pub fn build_range(&self) -> vk::AccelerationStructureBuildRangeInfoKHR {
		vk::AccelerationStructureBuildRangeInfoKHR {
			primitive_count: self.triangle_count,
			primitive_offset: 0,
			first_vertex: 0,
			transform_offset: self.transform_offset,
		}
	}
}

/// One triangle geometry per primitive, in mesh order.
#[profiling::function]
pub fn triangle_geometries(scene: &PreparedSceneDisk, addresses: GeometryAddresses) -> Vec<TriangleGeometry> {
	scene
		.meshes
		.iter()
		.enumerate()
		.flat_map(|(mesh_index, mesh)| {
			scene.primitives[mesh.primitives.to_usize()]
				.iter()
				.map(move |primitive| (mesh_index, primitive))
		})
		.map(|(mesh_index, primitive)| TriangleGeometry {
			vertex_address: addresses.vertex_buffer,
			vertex_stride: scene.vertices.stride() as u64,
			max_vertex: (primitive.first_vertex + primitive.vertex_count).saturating_sub(1),
			index_address: addresses.index_buffer + primitive.first_index as u64 * INDEX_SIZE,
			triangle_count: primitive.triangle_count(),
			transform_offset: (mesh_index as u64 * TRANSFORM_SIZE) as u32,
			opaque: opaque(&scene.materials, primitive),
		})
		.collect()
}

pub const CLUSTER_INDEX_FORMAT_8BIT: u32 = 1;
pub const CLUSTER_GEOMETRY_CULL_DISABLE: u32 = 1 << 29;
pub const CLUSTER_GEOMETRY_NO_DUPLICATE_ANYHIT_INVOCATION: u32 = 1 << 30;
pub const CLUSTER_GEOMETRY_OPAQUE: u32 = 1 << 31;
pub const CLUSTER_GEOMETRY_INDEX_MASK: u32 = (1 << 24) - 1;

/// Build input of one triangle cluster, laid out like `VkClusterAccelerationStructureBuildTriangleClusterInfoNV`.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct ClusterTriangleInput {
	pub cluster_id: u32,
	pub cluster_flags: u32,
	/// triangle count in bits 0..9, vertex count in 9..18, position truncation in 18..24, index format in 24..28
	pub packed_counts: u32,
	/// geometry index in bits 0..24, geometry flags in 29..32
	pub base_geometry_index_and_flags: u32,
	pub index_buffer_stride: u16,
	pub vertex_buffer_stride: u16,
	pub geometry_index_and_flags_buffer_stride: u16,
	pub opacity_micromap_index_buffer_stride: u16,
	pub index_buffer: u64,
	pub vertex_buffer: u64,
	pub geometry_index_and_flags_buffer: u64,
	pub opacity_micromap_array: u64,
	pub opacity_micromap_index_buffer: u64,
}
const_assert_eq!(size_of::<ClusterTriangleInput>(), 64);

impl ClusterTriangleInput {
	pub fn pack_counts(triangle_count: u32, vertex_count: u32, index_format: u32) -> u32 {
		(triangle_count & 0x1ff) | ((vertex_count & 0x1ff) << 9) | ((index_format & 0xf) << 24)
	}

	pub fn triangle_count(&self) -> u32 {
		self.packed_counts & 0x1ff
	}

	pub fn vertex_count(&self) -> u32 {
		(self.packed_counts >> 9) & 0x1ff
	}

	pub fn geometry_index(&self) -> u32 {
		self.base_geometry_index_and_flags & CLUSTER_GEOMETRY_INDEX_MASK
	}
}

/// Positions of every cluster local vertex, so each cluster reads a contiguous run of vertices.
#[profiling::function]
pub fn gather_cluster_positions(vertices: &VertexBuffer, clusters: &ClusterBuffers) -> Vec<Vec3> {
	clusters
		.local_vertices
		.iter()
		.map(|&global| vertices.position(global as usize))
		.collect()
}

/// Device addresses of the gathered cluster positions and the cluster local index buffer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusterAddresses {
	pub positions: u64,
	pub local_indices: u64,
}

#[profiling::function]
pub fn cluster_inputs(
	scene: &PreparedSceneDisk,
	addresses: ClusterAddresses,
) -> Result<Vec<ClusterTriangleInput>, GeometryError> {
	let clusters = scene.clusters.as_ref().ok_or(GeometryError::MissingClusters)?;
	let position_stride = size_of::<Vec3>() as u64;
	let mut inputs = Vec::with_capacity(clusters.len());
	for (primitive_index, (primitive, range)) in scene.primitives.iter().zip(&clusters.primitive_clusters).enumerate() {
		let flags = if opaque(&scene.materials, primitive) {
			CLUSTER_GEOMETRY_OPAQUE
		} else {
			CLUSTER_GEOMETRY_NO_DUPLICATE_ANYHIT_INVOCATION
		};
		for cluster_id in range.to_usize() {
			let cluster = clusters.clusters[cluster_id];
			inputs.push(ClusterTriangleInput {
				cluster_id: cluster_id as u32,
				packed_counts: ClusterTriangleInput::pack_counts(
					cluster.num_triangles as u32,
					cluster.num_vertices as u32,
					CLUSTER_INDEX_FORMAT_8BIT,
				),
				base_geometry_index_and_flags: (primitive_index as u32 & CLUSTER_GEOMETRY_INDEX_MASK) | flags,
				index_buffer_stride: 1,
				vertex_buffer_stride: position_stride as u16,
				index_buffer: addresses.local_indices + cluster.first_local_triangle as u64 * 3,
				vertex_buffer: addresses.positions + cluster.first_local_vertex as u64 * position_stride,
				..ClusterTriangleInput::default()
			});
		}
	}
	Ok(inputs)
}
