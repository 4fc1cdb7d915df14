use crate::flags::LoadConfig;
use crate::gltf::{GltfFile, find_gltf_files};
use crate::model::Model;
use anyhow::Context;
use rayon::prelude::*;
use scene_geometry_disk::stats::SceneStats;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct ProcessedScene {
	pub file: GltfFile,
	pub stats: SceneStats,
}

/// Loads every glTF file below `models_dir` with `config` and writes its prepared scene below `out_dir`. Files are
/// processed in parallel, the first failure aborts the build.
pub fn build_script(models_dir: &Path, out_dir: &Path, config: LoadConfig) -> anyhow::Result<Vec<ProcessedScene>> {
	profiling::function_scope!();
	config.validate()?;
	let model_paths = find_gltf_files(models_dir, out_dir)
		.with_context(|| format!("failed searching for gltf files in {models_dir:?}"))?;
	log::info!("preprocessing {} gltf files", model_paths.len());

	profiling::scope!("processing all models");
	model_paths
		.into_par_iter()
		.map(|model| {
			profiling::scope!("processing model");
			let disk = Model::load(&model.src_path, config)
				.with_context(|| format!("processing gltf failed {:?}", model.src_path))?
				.into_disk();
			if let Some(parent) = model.out_path.parent() {
				fs::create_dir_all(parent)
					.with_context(|| format!("failed creating output directories for file {:?}", model.out_path))?;
			}
			let out_file = File::create(&model.out_path)
				.with_context(|| format!("failed creating output file {:?}", model.out_path))?;
			disk.serialize_to(BufWriter::new(out_file))
				.with_context(|| format!("zstd stream failed writing {:?}", model.out_path))?;
			log::info!(
				"{:?}: {} meshes, {} triangles",
				model.relative,
				disk.stats.meshes,
				disk.stats.triangles
			);
			Ok(ProcessedScene {
				stats: disk.stats,
				file: model,
			})
		})
		.collect()
}
