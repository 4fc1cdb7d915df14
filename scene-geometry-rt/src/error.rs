use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum GeometryError {
	EmptyScene,
	MissingClusters,
	MaterialOutOfRange { primitive: usize, material: u32 },
	/// acceleration structure inputs were requested without the device supporting them
	MissingCapability(&'static str),
}

impl Display for GeometryError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			GeometryError::EmptyScene => f.write_str("scene has no vertices or indices to upload"),
			GeometryError::MissingClusters => f.write_str("scene was prepared without clusters"),
			GeometryError::MaterialOutOfRange { primitive, material } => {
				write!(f, "primitive {primitive} references missing material {material}")
			}
			GeometryError::MissingCapability(capability) => write!(f, "device lacks {capability}"),
		}
	}
}

impl std::error::Error for GeometryError {}
