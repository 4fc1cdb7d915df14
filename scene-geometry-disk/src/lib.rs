pub mod cluster;
pub mod material;
pub mod meshlet;
pub mod primitive;
pub mod scene;
pub mod stats;
pub mod vertex;

pub use scene_geometry_shader::range;
