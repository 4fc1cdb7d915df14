use rkyv::{Archive, Deserialize, Serialize};
pub use scene_geometry_shader::meshlet::*;
use scene_geometry_shader::range::RangeU32;

/// Meshlets of all primitives of a scene. Meshlet vertices map to global vertex ids.
#[derive(Clone, Debug, Default, Archive, Serialize, Deserialize)]
pub struct MeshletBuffers {
	pub meshlets: Vec<MeshletData>,
	pub vertices: Vec<u32>,
	pub triangles: Vec<PackedTriangle>,
	/// the meshlets of primitive N are `meshlets[primitive_meshlets[N]]`
	pub primitive_meshlets: Vec<RangeU32>,
}

impl MeshletBuffers {
	/// Appends the meshlets of another primitive, fixing up their offsets.
	pub fn append(&mut self, other: &mut Self) {
		let vertices_start = self.vertices.len() as u32;
		let triangle_start = self.triangles.len() as u32;
		let meshlet_start = self.meshlets.len() as u32;
		self.vertices.append(&mut other.vertices);
		self.triangles.append(&mut other.triangles);

		for m in &mut other.meshlets {
			m.vertex_offset += vertices_start;
			m.triangle_offset += triangle_start;
		}
		self.meshlets.append(&mut other.meshlets);
		self.primitive_meshlets.extend(
			other
				.primitive_meshlets
				.drain(..)
				.map(|r| RangeU32::new(r.start + meshlet_start, r.end + meshlet_start)),
		);
	}

	pub fn meshlet(&self, index: usize) -> MeshletReader<'_> {
		MeshletReader {
			data: self.meshlets[index],
			buffers: self,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = MeshletReader<'_>> + '_ {
		(0..self.meshlets.len()).map(|i| self.meshlet(i))
	}
}

impl FromIterator<MeshletBuffers> for MeshletBuffers {
	fn from_iter<T: IntoIterator<Item = MeshletBuffers>>(iter: T) -> Self {
		let mut out = MeshletBuffers::default();
		for mut e in iter {
			out.append(&mut e);
		}
		out
	}
}

#[derive(Copy, Clone)]
pub struct MeshletReader<'a> {
	pub data: MeshletData,
	pub buffers: &'a MeshletBuffers,
}

impl MeshletReader<'_> {
	pub fn load_vertex(&self, index: usize) -> u32 {
		let len = self.data.vertex_count as usize;
		assert!(
			index < len,
			"index out of bounds: the len is {len} but the index is {index}"
		);
		self.buffers.vertices[self.data.vertex_offset as usize + index]
	}

	pub fn load_local_triangle(&self, triangle: usize) -> [u32; 3] {
		let len = self.data.triangle_count as usize;
		assert!(
			triangle < len,
			"index out of bounds: the len is {len} but the index is {triangle}"
		);
		self.buffers.triangles[self.data.triangle_offset as usize + triangle].to_values()
	}

	/// triangle with global vertex ids
	pub fn load_triangle(&self, triangle: usize) -> [u32; 3] {
		self.load_local_triangle(triangle).map(|i| self.load_vertex(i as usize))
	}

	pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
		(0..self.data.triangle_count as usize).map(|t| self.load_triangle(t))
	}
}
