use clap::Parser;
use scene_geometry_disk::stats::SceneStats;
use scene_geometry_preprocess::build_script::build_script;
use scene_geometry_preprocess::flags::{LoadConfig, LoadFlags};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct PreprocessArgs {
	#[arg(short, long)]
	models_dir: PathBuf,
	#[arg(short, long)]
	out_dir: PathBuf,
	/// uniform scale applied to every scene root
	#[arg(long, default_value_t = 1.)]
	scale: f32,
	/// build meshlets for the mesh shading pipeline
	#[arg(long)]
	meshlets: bool,
	/// build spatial clusters for cluster acceleration structures
	#[arg(long)]
	clusters: bool,
	#[arg(long)]
	pre_transform: bool,
	#[arg(long)]
	pre_multiply_colors: bool,
	#[arg(long)]
	flip_y: bool,
	#[arg(long)]
	no_images: bool,
	#[arg(long)]
	optimize_vertex_cache: bool,
	#[arg(long)]
	geometry_node_per_primitive: bool,
	#[arg(long)]
	geometry_node_per_mesh: bool,
}

impl PreprocessArgs {
	fn flags(&self) -> LoadFlags {
		[
			(self.meshlets, LoadFlags::PREPARE_MESH_SHADER_PIPELINE),
			(self.clusters, LoadFlags::MAKE_CLUSTERS),
			(self.pre_transform, LoadFlags::PRE_TRANSFORM_VERTICES),
			(self.pre_multiply_colors, LoadFlags::PRE_MULTIPLY_VERTEX_COLORS),
			(self.flip_y, LoadFlags::FLIP_Y),
			(self.no_images, LoadFlags::DONT_LOAD_IMAGES),
			(self.optimize_vertex_cache, LoadFlags::OPTIMIZE_VERTEX_CACHE),
			(self.geometry_node_per_primitive, LoadFlags::GEOMETRY_NODE_PER_PRIMITIVE),
			(self.geometry_node_per_mesh, LoadFlags::GEOMETRY_NODE_PER_MESH),
		]
		.into_iter()
		.filter(|(enabled, _)| *enabled)
		.map(|(_, flag)| flag)
		.collect()
	}
}

pub fn main() -> anyhow::Result<()> {
	env_logger::init();
	let args = PreprocessArgs::parse();
	let config = LoadConfig::new(args.flags()).with_scale(args.scale);
	let result = build_script(&args.models_dir, &args.out_dir, config)?;
	let total = result.iter().map(|scene| scene.stats).sum::<SceneStats>();
	println!("{total:#?}");
	Ok(())
}
