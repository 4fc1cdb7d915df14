use super::*;
use crate::test_gltf::{GltfBuilder, grid};
use glam::{Vec3, Vec4};
use gltf::accessor::DataType;
use scene_geometry_disk::vertex::VertexLayout;
use serde_json::json;

fn flatten_all(gltf: &Gltf, layout: VertexLayout) -> anyhow::Result<Flattener<'_>> {
	let mut flattener = Flattener::new(gltf, layout, 42);
	for mesh in gltf.meshes() {
		flattener.flatten_mesh(mesh)?;
	}
	Ok(flattener)
}

fn triangle() -> [Vec3; 3] {
	[Vec3::ZERO, Vec3::X, Vec3::Y]
}

#[test]
fn u8_indices_are_offset_by_vertex_start() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let (positions, indices) = grid(5, 2, 1., 6);
	let first = b.positions(&positions[..10]);
	let first_indices = b.indices_u16(&indices.iter().map(|&i| i as u16).collect::<Vec<_>>());
	let second = b.positions(&triangle());
	let second_indices = b.indices_u8(&[0, 1, 2]);
	b.mesh(vec![
		GltfBuilder::primitive(first, Some(first_indices)),
		GltfBuilder::primitive(second, Some(second_indices)),
	]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	let second = flattener.primitives[1];
	assert_eq!(second.first_vertex, 10);
	assert_eq!(&flattener.indices[second.index_range()], [10, 11, 12]);
	assert_eq!(flattener.vertices.len(), 13);
	Ok(())
}

#[test]
fn indices_stay_within_their_primitive() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let mut primitives = Vec::new();
	for (cols, rows, triangles) in [(4, 4, 18), (3, 2, 4), (6, 3, 20)] {
		let (positions, indices) = grid(cols, rows, 1., triangles);
		let position = b.positions(&positions);
		let indices = b.indices_u32(&indices);
		primitives.push(GltfBuilder::primitive(position, Some(indices)));
	}
	b.mesh(primitives);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	assert_eq!(flattener.primitives.len(), 3);
	for p in &flattener.primitives {
		let vertices = p.vertex_range();
		assert!(
			flattener.indices[p.index_range()]
				.iter()
				.all(|&i| vertices.contains(&(i as usize)))
		);
	}
	Ok(())
}

#[test]
fn attribute_defaults() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	b.mesh(vec![GltfBuilder::primitive(position, None)]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	let v = flattener.vertices.vertex(1);
	assert_eq!(v.position, Vec3::X);
	assert_eq!(v.normal, Vec3::ZERO);
	assert_eq!(v.uv, glam::Vec2::ZERO);
	assert_eq!(v.color, Vec4::ONE);
	assert_eq!(v.tangent, Vec4::ZERO);
	assert_eq!(flattener.primitives[0].material, 42);
	Ok(())
}

#[test]
fn normals_are_normalized_and_colors_promoted() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	let normals = b.vec3s(&[Vec3::new(0., 0., 2.), Vec3::new(0., 3., 0.), Vec3::new(4., 0., 0.)]);
	let colors = b.vec3s(&[Vec3::new(1., 0., 0.), Vec3::new(0., 1., 0.), Vec3::new(0., 0., 1.)]);
	let mut primitive = GltfBuilder::primitive(position, None);
	primitive["attributes"]["NORMAL"] = json!(normals);
	primitive["attributes"]["COLOR_0"] = json!(colors);
	b.mesh(vec![primitive]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	assert_eq!(flattener.vertices.vertex(0).normal, Vec3::Z);
	assert_eq!(flattener.vertices.vertex(1).normal, Vec3::Y);
	assert_eq!(flattener.vertices.vertex(2).color, Vec4::new(0., 0., 1., 1.));
	Ok(())
}

#[test]
fn non_indexed_primitive_gets_sequential_indices() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let first = b.positions(&triangle());
	let second = b.positions(&triangle());
	b.mesh(vec![
		GltfBuilder::primitive(first, None),
		GltfBuilder::primitive(second, None),
	]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	assert_eq!(flattener.indices, [0, 1, 2, 3, 4, 5]);
	Ok(())
}

#[test]
fn skin_attributes_require_joints_and_weights() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	let joints = b.joints(&[[1, 2, 3, 4], [0, 0, 0, 0], [5, 0, 0, 0]]);
	let weights = b.vec4s(&[Vec4::new(0.25, 0.25, 0.25, 0.25), Vec4::X, Vec4::X]);
	let mut skinned = GltfBuilder::primitive(position, None);
	skinned["attributes"]["JOINTS_0"] = json!(joints);
	skinned["attributes"]["WEIGHTS_0"] = json!(weights);
	let mut joints_only = GltfBuilder::primitive(position, None);
	joints_only["attributes"]["JOINTS_0"] = json!(joints);
	b.mesh(vec![skinned, joints_only]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Skinned)?;
	let VertexBuffer::Skinned(vertices) = &flattener.vertices else {
		panic!("expected skinned layout");
	};
	assert_eq!(vertices[0].joints, Vec4::new(1., 2., 3., 4.));
	assert_eq!(vertices[0].weights, Vec4::splat(0.25));
	assert_eq!(vertices[3].joints, Vec4::ZERO);
	assert_eq!(vertices[3].weights, Vec4::ZERO);
	Ok(())
}

#[test]
fn index_count_must_be_multiple_of_3() {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	let indices = b.indices_u16(&[0, 1, 2, 0]);
	b.mesh(vec![GltfBuilder::primitive(position, Some(indices))]);
	let gltf = b.build();

	let err = flatten_all(&gltf, VertexLayout::Simple).err().unwrap();
	assert!(matches!(
		err.downcast_ref::<SceneError>(),
		Some(SceneError::IndexCountNotMultipleOf3 { count: 4 })
	));
}

#[test]
fn index_out_of_range() {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	let indices = b.indices_u8(&[0, 1, 3]);
	b.mesh(vec![GltfBuilder::primitive(position, Some(indices))]);
	let gltf = b.build();

	let err = flatten_all(&gltf, VertexLayout::Simple).err().unwrap();
	assert!(matches!(
		err.downcast_ref::<SceneError>(),
		Some(SceneError::IndexOutOfRange {
			index: 3,
			vertex_count: 3
		})
	));
}

#[test]
fn remapped_index_must_fit_32_bits() {
	let mut out = Vec::new();
	let err = append_remapped([0, 1, 2].into_iter(), u32::MAX - 1, 4, &mut out).unwrap_err();
	assert!(matches!(
		err,
		SceneError::IndexOutOfRange {
			index: 2,
			vertex_count: 4
		}
	));
	assert_eq!(out, [u32::MAX - 1, u32::MAX]);
}

#[test]
fn primitive_must_be_triangle_list() {
	let mut b = GltfBuilder::new();
	let position = b.positions(&triangle());
	let mut primitive = GltfBuilder::primitive(position, None);
	primitive["mode"] = json!(1);
	b.mesh(vec![primitive]);
	let gltf = b.build();

	let err = flatten_all(&gltf, VertexLayout::Simple).err().unwrap();
	assert!(matches!(
		err.downcast_ref::<SceneError>(),
		Some(SceneError::PrimitiveMustBeTriangleList)
	));
}

#[test]
fn unsupported_index_width() {
	for observed in [DataType::I8, DataType::I16, DataType::F32] {
		let err = IndexWidth::try_from(observed).unwrap_err();
		assert_eq!(err.to_string(), format!("unsupported index width: {observed:?}"));
	}
	assert_eq!(IndexWidth::try_from(DataType::U8).unwrap(), IndexWidth::U8);
	assert_eq!(IndexWidth::try_from(DataType::U16).unwrap().bytes(), 2);
	assert_eq!(IndexWidth::try_from(DataType::U32).unwrap().bytes(), 4);
}

#[test]
fn bounds_cover_vertices() -> anyhow::Result<()> {
	let mut b = GltfBuilder::new();
	let position = b.positions(&[Vec3::new(-1., 2., 0.), Vec3::new(3., -4., 1.), Vec3::ZERO]);
	b.mesh(vec![GltfBuilder::primitive(position, None)]);
	let gltf = b.build();

	let flattener = flatten_all(&gltf, VertexLayout::Simple)?;
	let bounds = flattener.primitives[0].bounds;
	assert_eq!(bounds.min, Vec3::new(-1., -4., 0.));
	assert_eq!(bounds.max, Vec3::new(3., 2., 1.));
	Ok(())
}
