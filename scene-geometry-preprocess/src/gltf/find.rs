use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Clone, Debug)]
pub struct GltfFile {
	pub src_path: PathBuf,
	pub relative: PathBuf,
	pub out_path: PathBuf,
}

/// Finds all `.gltf` and `.glb` files below `models_dir`, each mapped to a `<file name>.bin` output path with the same
/// relative location below `out_dir`.
pub fn find_gltf_files(models_dir: &Path, out_dir: &Path) -> io::Result<Vec<GltfFile>> {
	profiling::function_scope!();
	let models_dir = fs::canonicalize(models_dir)?;
	if models_dir.is_file() {
		let relative = PathBuf::from(models_dir.file_name().unwrap_or_default());
		return Ok(vec![gltf_file(models_dir.clone(), relative, out_dir)]);
	}

	Ok(walkdir::WalkDir::new(&models_dir)
		.follow_links(true)
		.sort_by_file_name()
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| e.file_type().is_file())
		.filter(|e| e.path().extension().is_some_and(|ext| ext == "gltf" || ext == "glb"))
		.filter_map(|e| {
			let src_path = e.into_path();
			let relative = src_path.strip_prefix(&models_dir).ok()?.to_path_buf();
			Some(gltf_file(src_path, relative, out_dir))
		})
		.collect::<Vec<_>>())
}

fn gltf_file(src_path: PathBuf, relative: PathBuf, out_dir: &Path) -> GltfFile {
	let out_relative = relative.with_file_name(format!(
		"{}.bin",
		relative.file_name().map(|c| c.to_string_lossy()).unwrap_or_default()
	));
	GltfFile {
		out_path: out_dir.join(out_relative),
		src_path,
		relative,
	}
}
