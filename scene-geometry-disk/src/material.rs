use glam::{Vec3, Vec4};
use rkyv::{Archive, Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Archive, Serialize, Deserialize)]
pub enum AlphaMode {
	#[default]
	Opaque,
	Mask,
	Blend,
}

/// Texture indices refer to the source document's images.
#[derive(Clone, Debug, PartialEq, Archive, Serialize, Deserialize)]
pub struct MaterialData {
	pub name: Option<String>,
	pub alpha_mode: AlphaMode,
	pub alpha_cutoff: f32,
	pub base_color_factor: Vec4,
	pub metallic_factor: f32,
	pub roughness_factor: f32,
	pub emissive_factor: Vec3,
	pub double_sided: bool,
	pub base_color_texture: Option<u32>,
	pub metallic_roughness_texture: Option<u32>,
	pub normal_texture: Option<u32>,
	pub occlusion_texture: Option<u32>,
	pub emissive_texture: Option<u32>,
}

impl Default for MaterialData {
	fn default() -> Self {
		Self {
			name: None,
			alpha_mode: AlphaMode::Opaque,
			alpha_cutoff: 1.,
			base_color_factor: Vec4::ONE,
			metallic_factor: 1.,
			roughness_factor: 1.,
			emissive_factor: Vec3::ZERO,
			double_sided: false,
			base_color_texture: None,
			metallic_roughness_texture: None,
			normal_texture: None,
			occlusion_texture: None,
			emissive_texture: None,
		}
	}
}

/// Where an image of the source document lives. Images are never decoded here.
#[derive(Clone, Debug, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum ImageSource {
	Uri(String),
	BufferView { view: u32, mime_type: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ImageRef {
	pub name: Option<String>,
	pub source: ImageSource,
}
