#![cfg_attr(not(feature = "disk"), no_std)]
// otherwise you won't see any warnings
#![cfg_attr(target_arch = "spirv", deny(warnings))]

pub mod cluster;
pub mod geometry_node;
pub mod meshlet;
pub mod range;
pub mod uniform;
pub mod vertex;
