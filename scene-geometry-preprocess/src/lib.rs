pub mod build_script;
pub mod cluster;
pub mod error;
pub mod flags;
pub mod flatten;
pub mod gltf;
pub mod meshlet;
pub mod model;

#[cfg(test)]
mod test_gltf;
