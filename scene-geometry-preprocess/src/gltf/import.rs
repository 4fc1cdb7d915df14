use gltf::buffer::Data;
use gltf::{Buffer, Document};
use smallvec::SmallVec;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// A glTF document with all its buffers loaded. Images are never loaded.
pub struct Gltf {
	pub document: Document,
	pub base: Option<PathBuf>,
	pub buffers: SmallVec<[Data; 1]>,
}

impl Gltf {
	#[profiling::function]
	pub fn open(path: &Path) -> Result<Self, gltf::Error> {
		let base = path
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from("./"));
		let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
		Self::from_document(document, blob, Some(base))
	}

	/// Parses a `.gltf` or `.glb` from memory. Relative buffer URIs can not be resolved, embedded and data URIs can.
	#[profiling::function]
	pub fn from_slice(slice: &[u8]) -> Result<Self, gltf::Error> {
		let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(slice)?;
		Self::from_document(document, blob, None)
	}

	fn from_document(document: Document, mut blob: Option<Vec<u8>>, base: Option<PathBuf>) -> Result<Self, gltf::Error> {
		let buffers = document
			.buffers()
			.map(|buffer| Data::from_source_and_blob(buffer.source(), base.as_deref(), &mut blob))
			.collect::<Result<_, _>>()?;
		Ok(Self {
			document,
			base,
			buffers,
		})
	}

	pub fn buffer(&self, buffer: Buffer) -> Option<&[u8]> {
		self.buffers.get(buffer.index()).map(|b| &b.0[..])
	}

	/// The `KHR_materials_pbrSpecularGlossiness` extension switches materials away from the metallic roughness
	/// workflow.
	pub fn metallic_roughness_workflow(&self) -> bool {
		!self
			.extensions_used()
			.any(|ext| ext == "KHR_materials_pbrSpecularGlossiness")
	}
}

impl Deref for Gltf {
	type Target = Document;

	fn deref(&self) -> &Self::Target {
		&self.document
	}
}
