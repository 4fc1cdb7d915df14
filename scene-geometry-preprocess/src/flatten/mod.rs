mod index;
mod vertex;

pub use index::*;
pub use vertex::*;

use crate::error::SceneError;
use crate::gltf::Gltf;
use gltf::mesh::Mode;
use gltf::{Mesh, Primitive};
use scene_geometry_disk::cluster::BBox;
use scene_geometry_disk::primitive::PrimitiveData;
use scene_geometry_disk::range::RangeU32;
use scene_geometry_disk::vertex::{VertexBuffer, VertexLayout};

/// Accumulates the vertices, indices and primitives of all meshes into global arrays.
pub struct Flattener<'a> {
	gltf: &'a Gltf,
	pub vertices: VertexBuffer,
	pub indices: Vec<u32>,
	pub primitives: Vec<PrimitiveData>,
	default_material: u32,
}

impl<'a> Flattener<'a> {
	/// Primitives without a material reference `default_material`.
	pub fn new(gltf: &'a Gltf, layout: VertexLayout, default_material: u32) -> Self {
		Self {
			gltf,
			vertices: VertexBuffer::new(layout),
			indices: Vec::new(),
			primitives: Vec::new(),
			default_material,
		}
	}

	/// Flattens all primitives of a mesh, returning the range they occupy in [`Self::primitives`].
	#[profiling::function]
	pub fn flatten_mesh(&mut self, mesh: Mesh) -> anyhow::Result<RangeU32> {
		let start = self.primitives.len() as u32;
		for primitive in mesh.primitives() {
			self.flatten_primitive(primitive)?;
		}
		Ok(RangeU32::new(start, self.primitives.len() as u32))
	}

	pub fn flatten_primitive(&mut self, primitive: Primitive) -> anyhow::Result<()> {
		if primitive.mode() != Mode::Triangles {
			Err(SceneError::PrimitiveMustBeTriangleList)?;
		}
		// the reader can only decode 8, 16 and 32 bit indices
		if let Some(accessor) = primitive.indices() {
			IndexWidth::try_from(accessor.data_type())?;
		}

		let vertex_start = self.vertices.len() as u32;
		let index_start = self.indices.len() as u32;
		let gltf = self.gltf;
		let reader = primitive.reader(|b| gltf.buffer(b));
		let vertex_count = append_vertices(&reader, &mut self.vertices)?;

		match reader.read_indices() {
			Some(indices) => append_read_indices(indices, vertex_start, vertex_count, &mut self.indices)?,
			None => {
				log::debug!(
					"primitive {} has no indices, generating sequential indices",
					primitive.index()
				);
				append_remapped(0..vertex_count as u32, vertex_start, vertex_count, &mut self.indices)?;
			}
		}

		let index_count = self.indices.len() - index_start as usize;
		if index_count % 3 != 0 {
			Err(SceneError::IndexCountNotMultipleOf3 { count: index_count })?;
		}

		self.primitives.push(PrimitiveData {
			first_index: index_start,
			index_count: index_count as u32,
			first_vertex: vertex_start,
			vertex_count: vertex_count as u32,
			material: primitive
				.material()
				.index()
				.map_or(self.default_material, |i| i as u32),
			bounds: BBox::from_points(self.vertices.positions(vertex_start as usize..self.vertices.len())),
		});
		Ok(())
	}

	pub fn finish(self) -> (VertexBuffer, Vec<u32>, Vec<PrimitiveData>) {
		(self.vertices, self.indices, self.primitives)
	}
}

#[cfg(test)]
mod tests;
