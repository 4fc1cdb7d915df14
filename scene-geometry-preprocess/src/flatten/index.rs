use crate::error::SceneError;
use gltf::accessor::DataType;
use gltf::mesh::util::ReadIndices;

/// Index component widths a primitive may use.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IndexWidth {
	U8,
	U16,
	U32,
}

impl TryFrom<DataType> for IndexWidth {
	type Error = SceneError;

	fn try_from(value: DataType) -> Result<Self, Self::Error> {
		match value {
			DataType::U8 => Ok(IndexWidth::U8),
			DataType::U16 => Ok(IndexWidth::U16),
			DataType::U32 => Ok(IndexWidth::U32),
			observed => Err(SceneError::UnsupportedIndexWidth { observed }),
		}
	}
}

impl IndexWidth {
	pub fn bytes(&self) -> usize {
		match self {
			IndexWidth::U8 => 1,
			IndexWidth::U16 => 2,
			IndexWidth::U32 => 4,
		}
	}
}

/// Widens indices to 32 bits and offsets them by `vertex_start`, the primitive's first vertex in the global array.
/// Every index must address one of the primitive's `vertex_count` vertices, and the global index must fit in 32 bits.
pub fn append_remapped(
	indices: impl Iterator<Item = u32>,
	vertex_start: u32,
	vertex_count: usize,
	out: &mut Vec<u32>,
) -> Result<(), SceneError> {
	for index in indices {
		let global = Some(index)
			.filter(|&i| (i as usize) < vertex_count)
			.and_then(|i| i.checked_add(vertex_start))
			.ok_or(SceneError::IndexOutOfRange { index, vertex_count })?;
		out.push(global);
	}
	Ok(())
}

pub fn append_read_indices(
	indices: ReadIndices<'_>,
	vertex_start: u32,
	vertex_count: usize,
	out: &mut Vec<u32>,
) -> Result<(), SceneError> {
	match indices {
		ReadIndices::U8(iter) => append_remapped(iter.map(u32::from), vertex_start, vertex_count, out),
		ReadIndices::U16(iter) => append_remapped(iter.map(u32::from), vertex_start, vertex_count, out),
		ReadIndices::U32(iter) => append_remapped(iter, vertex_start, vertex_count, out),
	}
}
