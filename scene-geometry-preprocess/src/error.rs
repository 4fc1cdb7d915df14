use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SceneError {
	NoScene,
	NoVertexPositions,
	PrimitiveMustBeTriangleList,
	UnsupportedIndexWidth { observed: gltf::accessor::DataType },
	IndexCountNotMultipleOf3 { count: usize },
	IndexOutOfRange { index: u32, vertex_count: usize },
	NodeCycle { node: usize },
	ConflictingFlags(&'static str),
	InvalidScale { scale: f32 },
	EmptyGeometry,
	ClusterCoverageMismatch { expected: usize, covered: usize },
	UnknownAnimation { index: usize },
}

impl Display for SceneError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SceneError::NoScene => f.write_str("The document contains no scene"),
			SceneError::NoVertexPositions => f.write_str("A mesh primitive exists with no vertex positions"),
			SceneError::PrimitiveMustBeTriangleList => f.write_str("All primitives must be triangle lists"),
			SceneError::UnsupportedIndexWidth { observed } => write!(f, "unsupported index width: {observed:?}"),
			SceneError::IndexCountNotMultipleOf3 { count } => {
				write!(f, "A primitive has {count} indices, which is not a multiple of 3")
			}
			SceneError::IndexOutOfRange { index, vertex_count } => {
				write!(f, "Index {index} is out of range for a primitive with {vertex_count} vertices")
			}
			SceneError::NodeCycle { node } => write!(
				f,
				"Node {node} is reachable through more than one path, the node graph must be a forest"
			),
			SceneError::ConflictingFlags(what) => write!(f, "Conflicting load flags: {what}"),
			SceneError::InvalidScale { scale } => write!(f, "Scale must be positive and finite, got {scale}"),
			SceneError::EmptyGeometry => f.write_str("Meshlet or cluster building requires vertices and indices"),
			SceneError::ClusterCoverageMismatch { expected, covered } => write!(
				f,
				"Clusters cover {covered} indices but the primitive has {expected} indices"
			),
			SceneError::UnknownAnimation { index } => write!(f, "Animation {index} does not exist"),
		}
	}
}

impl std::error::Error for SceneError {}
