use crate::error::SceneError;
use glam::{Vec2, Vec3, Vec4};
use gltf::mesh::Reader;
use gltf::Buffer;
use scene_geometry_disk::vertex::{SkinAttributes, Vertex, VertexBuffer};

/// Appends all vertices of a primitive, filling absent attributes with defaults: zero normal, zero uv, opaque white
/// color and zero tangent. Returns the amount of vertices appended.
pub fn append_vertices<'a, 's, F>(reader: &Reader<'a, 's, F>, out: &mut VertexBuffer) -> Result<usize, SceneError>
where
	F: Clone + Fn(Buffer<'a>) -> Option<&'s [u8]>,
{
	let positions = reader.read_positions().ok_or(SceneError::NoVertexPositions)?;
	let mut normals = reader.read_normals();
	let mut uvs = reader.read_tex_coords(0).map(|t| t.into_f32());
	let mut colors = reader.read_colors(0).map(|c| c.into_rgba_f32());
	let mut tangents = reader.read_tangents();
	// skin attributes are only used if both exist
	let mut skin = reader
		.read_joints(0)
		.map(|j| j.into_u16())
		.zip(reader.read_weights(0).map(|w| w.into_f32()));

	let mut count = 0;
	for position in positions {
		let normal = normals
			.as_mut()
			.and_then(Iterator::next)
			.map_or(Vec3::ZERO, |n| Vec3::from(n).normalize_or_zero());
		let uv = uvs.as_mut().and_then(Iterator::next).map_or(Vec2::ZERO, Vec2::from);
		let color = colors.as_mut().and_then(Iterator::next).map_or(Vec4::ONE, Vec4::from);
		let tangent = tangents.as_mut().and_then(Iterator::next).map_or(Vec4::ZERO, Vec4::from);
		let skin = skin.as_mut().and_then(|(joints, weights)| {
			Some(SkinAttributes {
				joints: Vec4::from_array(joints.next()?.map(f32::from)),
				weights: Vec4::from(weights.next()?),
			})
		});
		out.push(Vertex::new(Vec3::from(position), normal, uv, color, tangent), skin);
		count += 1;
	}
	Ok(count)
}
