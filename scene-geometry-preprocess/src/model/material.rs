use glam::{Vec3, Vec4};
use gltf::image::Source;
use gltf::Material;
use scene_geometry_disk::material::{AlphaMode, ImageRef, ImageSource, MaterialData};

fn image_index(texture: gltf::Texture) -> u32 {
	texture.source().index() as u32
}

/// Without `load_images` every texture reference resolves to none, as there are no images to refer to.
#[profiling::function]
pub fn load_material(material: Material, load_images: bool) -> MaterialData {
	let pbr = material.pbr_metallic_roughness();
	let texture_image = |texture: gltf::Texture| load_images.then(|| image_index(texture));
	MaterialData {
		name: material.name().map(str::to_string),
		alpha_mode: match material.alpha_mode() {
			gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
			gltf::material::AlphaMode::Mask => AlphaMode::Mask,
			gltf::material::AlphaMode::Blend => AlphaMode::Blend,
		},
		alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
		base_color_factor: Vec4::from(pbr.base_color_factor()),
		metallic_factor: pbr.metallic_factor(),
		roughness_factor: pbr.roughness_factor(),
		emissive_factor: Vec3::from(material.emissive_factor()),
		double_sided: material.double_sided(),
		base_color_texture: pbr.base_color_texture().and_then(|t| texture_image(t.texture())),
		metallic_roughness_texture: pbr.metallic_roughness_texture().and_then(|t| texture_image(t.texture())),
		normal_texture: material.normal_texture().and_then(|t| texture_image(t.texture())),
		occlusion_texture: material.occlusion_texture().and_then(|t| texture_image(t.texture())),
		emissive_texture: material.emissive_texture().and_then(|t| texture_image(t.texture())),
	}
}

pub fn load_image_ref(image: gltf::Image) -> ImageRef {
	ImageRef {
		name: image.name().map(str::to_string),
		source: match image.source() {
			Source::Uri { uri, .. } => ImageSource::Uri(uri.to_string()),
			Source::View { view, mime_type } => ImageSource::BufferView {
				view: view.index() as u32,
				mime_type: mime_type.to_string(),
			},
		},
	}
}
