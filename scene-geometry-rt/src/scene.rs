use crate::acceleration::{
	ClusterAddresses, RayTracingCapabilities, TriangleGeometry, cluster_inputs, gather_cluster_positions,
	mesh_transforms, triangle_geometries,
};
use crate::descriptor::{GeometryAddresses, GeometryDescriptorTable};
use crate::error::GeometryError;
use crate::uploader::{Flushed, Slot, StagingBatch, UploadBoundary, UploadError};
use ash::vk;
use scene_geometry_disk::scene::{GeometryNodeGranularity, PreparedSceneDisk};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UploadConfig {
	pub capabilities: RayTracingCapabilities,
	/// added to the usage of every uploaded buffer
	pub extra_buffer_usage: vk::BufferUsageFlags,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SceneBuffer {
	Vertices,
	Indices,
	Meshlets,
	Clusters,
	/// gathered cluster positions and cluster build inputs
	ClusterBuildInput,
	Transforms,
	Descriptors,
}

impl UploadConfig {
	pub fn usage(&self, buffer: SceneBuffer, geometry_nodes: GeometryNodeGranularity) -> vk::BufferUsageFlags {
		let storage = vk::BufferUsageFlags::STORAGE_BUFFER | self.extra_buffer_usage;
		let addressed = if geometry_nodes == GeometryNodeGranularity::None {
			vk::BufferUsageFlags::empty()
		} else {
			vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS
		};
		let build_input = self.capabilities.build_input_usage();
		match buffer {
			SceneBuffer::Vertices => storage | vk::BufferUsageFlags::VERTEX_BUFFER | addressed | build_input,
			SceneBuffer::Indices => storage | vk::BufferUsageFlags::INDEX_BUFFER | addressed | build_input,
			SceneBuffer::Meshlets | SceneBuffer::Descriptors => storage,
			SceneBuffer::Clusters if self.capabilities.clusters() => storage | build_input,
			SceneBuffer::Clusters => storage,
			SceneBuffer::ClusterBuildInput | SceneBuffer::Transforms => {
				self.extra_buffer_usage
					| vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS
					| vk::BufferUsageFlags::ACCELERATION_STRUCTURE_BUILD_INPUT_READ_ONLY_KHR
			}
		}
	}
}

pub struct MeshletDeviceBuffers<B> {
	pub meshlets: B,
	pub vertices: B,
	pub triangles: B,
}

pub struct ClusterDeviceBuffers<B> {
	pub clusters: B,
	pub local_vertices: B,
	pub local_indices: B,
	pub bboxes: B,
	/// only with cluster acceleration structure support
	pub build: Option<ClusterBuildBuffers<B>>,
}

pub struct ClusterBuildBuffers<B> {
	pub positions: B,
	pub inputs: B,
	pub input_count: u32,
}

pub struct DescriptorBuffers<B> {
	pub table: GeometryDescriptorTable,
	/// per primitive or per mesh records, `None` if the table has no records
	pub nodes: Option<B>,
	/// per mesh tables only
	pub mesh_primitives: Option<B>,
}

pub struct AccelerationInputs<B> {
	pub transforms: B,
	pub transform_address: u64,
	pub triangles: Vec<TriangleGeometry>,
}

impl<B> AccelerationInputs<B> {
	pub fn geometries(&self) -> Vec<vk::AccelerationStructureGeometryKHR<'static>> {
		self.triangles
			.iter()
			.map(|t| t.to_vk(self.transform_address))
			.collect()
	}

	pub fn build_ranges(&self) -> Vec<vk::AccelerationStructureBuildRangeInfoKHR> {
		self.triangles.iter().map(TriangleGeometry::build_range).collect()
	}
}

/// Device local buffers of a prepared scene.
pub struct SceneBuffers<B> {
	pub vertices: B,
	pub indices: B,
	pub addresses: GeometryAddresses,
	pub meshlets: Option<MeshletDeviceBuffers<B>>,
	pub clusters: Option<ClusterDeviceBuffers<B>>,
	pub descriptors: Option<DescriptorBuffers<B>>,
	pub acceleration: Option<AccelerationInputs<B>>,
}

struct Slots<T>(T);

/// Uploads all buffers of a prepared scene in a single staged transfer. Geometry descriptor tables and acceleration
/// structure inputs are built against the device addresses of the uploaded vertex and index buffers.
#[profiling::function]
pub fn upload_scene<U: UploadBoundary + ?Sized>(
	scene: &PreparedSceneDisk,
	uploader: &U,
	config: &UploadConfig,
) -> anyhow::Result<SceneBuffers<U::Buffer>> {
	if scene.vertices.is_empty() || scene.indices.is_empty() {
		Err(GeometryError::EmptyScene)?;
	}
	let granularity = scene.geometry_nodes;
	let usage = |buffer| config.usage(buffer, granularity);
	let mut batch = StagingBatch::new(uploader);

	let (vertices, vertex_buffer) = batch.stage("vertices", usage(SceneBuffer::Vertices), scene.vertices.as_bytes())?;
	let (indices, index_buffer) = batch.stage("indices", usage(SceneBuffer::Indices), &scene.indices)?;
	let addresses = GeometryAddresses {
		vertex_buffer,
		index_buffer,
	};

	let meshlets = scene
		.meshlets
		.as_ref()
		.map(|m| {
			let meshlet_usage = usage(SceneBuffer::Meshlets);
			Ok::<_, UploadError>(Slots((
				batch.stage("meshlets", meshlet_usage, &m.meshlets)?.0,
				batch.stage("meshlet vertices", meshlet_usage, &m.vertices)?.0,
				batch.stage("meshlet triangles", meshlet_usage, &m.triangles)?.0,
			)))
		})
		.transpose()?;

	let clusters = match &scene.clusters {
		None => None,
		Some(c) => {
			let cluster_usage = usage(SceneBuffer::Clusters);
			let clusters = batch.stage("clusters", cluster_usage, &c.clusters)?.0;
			let local_vertices = batch.stage("cluster local vertices", cluster_usage, &c.local_vertices)?.0;
			let (local_indices, local_index_address) =
				batch.stage("cluster local indices", cluster_usage, &c.local_indices)?;
			let bboxes = batch.stage("cluster bboxes", cluster_usage, &c.bboxes)?.0;

			let build = if config.capabilities.clusters() {
				let build_usage = usage(SceneBuffer::ClusterBuildInput);
				let positions = gather_cluster_positions(&scene.vertices, c);
				let (positions, position_address) = batch.stage("cluster positions", build_usage, &positions)?;
				let inputs = cluster_inputs(
					scene,
					ClusterAddresses {
						positions: position_address,
						local_indices: local_index_address,
					},
				)?;
				let input_count = inputs.len() as u32;
				Some((positions, batch.stage("cluster build inputs", build_usage, &inputs)?.0, input_count))
			} else {
				log::debug!("device lacks cluster acceleration structures, skipping cluster build inputs");
				None
			};
			Some(Slots((clusters, local_vertices, local_indices, bboxes, build)))
		}
	};

	let descriptors = match GeometryDescriptorTable::build(scene, addresses)? {
		None => None,
		Some(table) => {
			let descriptor_usage = usage(SceneBuffer::Descriptors);
			let (nodes, mesh_primitives) = match &table {
				GeometryDescriptorTable::PerPrimitive(nodes) => {
					(batch.stage_optional("geometry nodes", descriptor_usage, nodes)?, None)
				}
				GeometryDescriptorTable::PerMesh { meshes, primitives } => (
					batch.stage_optional("geometry nodes", descriptor_usage, meshes)?,
					batch.stage_optional("mesh primitives", descriptor_usage, primitives)?,
				),
			};
			Some((table, nodes.map(|n| n.0), mesh_primitives.map(|p| p.0)))
		}
	};

	let acceleration = if config.capabilities.ray_tracing() {
		let transforms = mesh_transforms(&scene.meshes);
		let (transforms, transform_address) =
			batch.stage("mesh transforms", usage(SceneBuffer::Transforms), &transforms)?;
		Some((transforms, transform_address, triangle_geometries(scene, addresses)))
	} else {
		None
	};

	log::debug!("uploading {} scene buffers", batch.len());
	let mut flushed = batch.flush()?;
	Ok(SceneBuffers {
		vertices: flushed.take(vertices)?,
		indices: flushed.take(indices)?,
		addresses,
		meshlets: meshlets.map(|slots| slots.take(&mut flushed)).transpose()?,
		clusters: clusters.map(|slots| slots.take(&mut flushed)).transpose()?,
		descriptors: descriptors
			.map(|(table, nodes, mesh_primitives)| {
				Ok::<_, UploadError>(DescriptorBuffers {
					table,
					nodes: flushed.take_optional(nodes)?,
					mesh_primitives: flushed.take_optional(mesh_primitives)?,
				})
			})
			.transpose()?,
		acceleration: acceleration
			.map(|(transforms, transform_address, triangles)| {
				Ok::<_, UploadError>(AccelerationInputs {
					transforms: flushed.take(transforms)?,
					transform_address,
					triangles,
				})
			})
			.transpose()?,
	})
}

impl Slots<(Slot, Slot, Slot)> {
	fn take<B>(self, flushed: &mut Flushed<B>) -> Result<MeshletDeviceBuffers<B>, UploadError> {
		let (meshlets, vertices, triangles) = self.0;
		Ok(MeshletDeviceBuffers {
			meshlets: flushed.take(meshlets)?,
			vertices: flushed.take(vertices)?,
			triangles: flushed.take(triangles)?,
		})
	}
}

impl Slots<(Slot, Slot, Slot, Slot, Option<(Slot, Slot, u32)>)> {
	fn take<B>(self, flushed: &mut Flushed<B>) -> Result<ClusterDeviceBuffers<B>, UploadError> {
		let (clusters, local_vertices, local_indices, bboxes, build) = self.0;
		Ok(ClusterDeviceBuffers {
			clusters: flushed.take(clusters)?,
			local_vertices: flushed.take(local_vertices)?,
			local_indices: flushed.take(local_indices)?,
			bboxes: flushed.take(bboxes)?,
			build: build
				.map(|(positions, inputs, input_count)| {
					Ok::<_, UploadError>(ClusterBuildBuffers {
						positions: flushed.take(positions)?,
						inputs: flushed.take(inputs)?,
						input_count,
					})
				})
				.transpose()?,
		})
	}
}
