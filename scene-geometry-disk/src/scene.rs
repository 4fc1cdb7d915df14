use crate::cluster::ClusterBuffers;
use crate::material::{ImageRef, MaterialData};
use crate::meshlet::MeshletBuffers;
use crate::primitive::{MeshData, PrimitiveData};
use crate::stats::SceneStats;
use crate::vertex::VertexBuffer;
use rkyv::api::serialize_using;
use rkyv::ser::Serializer;
use rkyv::ser::sharing::Share;
use rkyv::ser::writer::IoWriter;
use rkyv::util::{AlignedVec, with_arena};
use rkyv::{Archive, Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use std::{fs, io};

pub const ZSTD_LEVEL: i32 = 3;

/// Which geometry descriptor table should be built for a scene.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Archive, Serialize, Deserialize)]
pub enum GeometryNodeGranularity {
	#[default]
	None,
	PerPrimitive,
	PerMesh,
}

/// A fully prepared scene: flattened vertices and indices with their primitive and mesh tables, plus meshlets or
/// clusters if requested.
#[derive(Clone, Debug, Archive, Serialize, Deserialize)]
pub struct PreparedSceneDisk {
	pub vertices: VertexBuffer,
	pub indices: Vec<u32>,
	pub primitives: Vec<PrimitiveData>,
	pub meshes: Vec<MeshData>,
	/// the last material is the default material
	pub materials: Vec<MaterialData>,
	pub images: Vec<ImageRef>,
	pub meshlets: Option<MeshletBuffers>,
	pub clusters: Option<ClusterBuffers>,
	pub geometry_nodes: GeometryNodeGranularity,
	pub stats: SceneStats,
}

impl PreparedSceneDisk {
	pub fn serialize_to(&self, write: impl Write) -> io::Result<()> {
		profiling::function_scope!();
		let mut encoder = zstd::Encoder::new(write, ZSTD_LEVEL)?;
		with_arena(|arena| {
			let mut serializer = Serializer::new(IoWriter::new(&mut encoder), arena.acquire(), Share::default());
			serialize_using::<_, rkyv::rancor::Error>(self, &mut serializer)
		})
		.map_err(io::Error::other)?;
		encoder.finish()?;
		Ok(())
	}

	/// Reads a scene written by [`Self::serialize_to`].
	///
	/// # Safety
	/// The file must contain a stream written by [`Self::serialize_to`], the archive is accessed without validation.
	pub unsafe fn load(path: &Path) -> io::Result<LoadedPreparedScene> {
		profiling::function_scope!();
		unsafe { LoadedPreparedScene::from_reader(fs::File::open(path)?) }
	}
}

pub struct LoadedPreparedScene {
	archive: AlignedVec,
}

impl LoadedPreparedScene {
	/// # Safety
	/// `read` must yield a stream written by [`PreparedSceneDisk::serialize_to`], the archive is accessed without
	/// validation.
	pub unsafe fn from_reader(read: impl Read) -> io::Result<Self> {
		profiling::function_scope!();
		let bytes = {
			profiling::scope!("zstd::decode_all");
			zstd::decode_all(read)?
		};
		let mut archive = AlignedVec::with_capacity(bytes.len());
		archive.extend_from_slice(&bytes);
		Ok(Self { archive })
	}

	pub fn root(&self) -> &ArchivedPreparedSceneDisk {
		// Safety: upheld by the callers of `from_reader`
		unsafe { rkyv::access_unchecked::<ArchivedPreparedSceneDisk>(&self.archive) }
	}

	pub fn deserialize(&self) -> Result<PreparedSceneDisk, rkyv::rancor::Error> {
		profiling::function_scope!();
		rkyv::deserialize::<PreparedSceneDisk, rkyv::rancor::Error>(self.root())
	}
}
