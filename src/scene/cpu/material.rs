use std::rc::Rc;

use glam::{
  Vec3,
  Vec4,
};

use crate::error::HalaSceneError;
use crate::config::HalaSceneConfig;
use super::image_data::HalaImageData;

/// A PBR metallic-roughness material.
/// Image indices point into the image table of the scene, `None` means absent.
#[derive(Debug, Clone, PartialEq)]
pub struct HalaMaterial {
  pub name: String,
  pub base_color_factor: Vec4,
  pub metallic_factor: f32,
  pub roughness_factor: f32,
  pub emissive_factor: Vec3,

  pub base_color_image_index: Option<u32>,
  pub metallic_roughness_image_index: Option<u32>,
  pub normal_image_index: Option<u32>,
  pub occlusion_image_index: Option<u32>,
  pub emissive_image_index: Option<u32>,
}

/// The default implementation of the material.
impl Default for HalaMaterial {
  fn default() -> Self {
    Self {
      name: String::new(),
      base_color_factor: Vec4::ONE,
      metallic_factor: 1.0,
      roughness_factor: 1.0,
      emissive_factor: Vec3::ZERO,
      base_color_image_index: None,
      metallic_roughness_image_index: None,
      normal_image_index: None,
      occlusion_image_index: None,
      emissive_image_index: None,
    }
  }
}

/// The images used when a material has no occlusion or emissive texture.
pub struct HalaDefaultImages {
  pub occlusion: Rc<HalaImageData>,
  pub emissive: Rc<HalaImageData>,
}

/// The implementation of the default images.
impl HalaDefaultImages {
  /// Create the default images from the configuration.
  /// A configured file takes precedence over the solid color.
  /// param config: The scene configuration.
  /// return: The default images.
  pub fn new(config: &HalaSceneConfig) -> Result<Self, HalaSceneError> {
    let size = config.default_image_size;
    let occlusion = match config.default_occlusion_image.as_ref() {
      Some(path) => HalaImageData::new_with_file(path)?,
      None => HalaImageData::new_with_color(size, size, config.default_occlusion_color),
    };
    let emissive = match config.default_emissive_image.as_ref() {
      Some(path) => HalaImageData::new_with_file(path)?,
      None => HalaImageData::new_with_color(size, size, config.default_emissive_color),
    };

    Ok(Self {
      occlusion: Rc::new(occlusion),
      emissive: Rc::new(emissive),
    })
  }
}

/// The five images bound for one material, in binding order.
pub struct HalaMaterialImages {
  pub base_color: Rc<HalaImageData>,
  pub metallic_roughness: Rc<HalaImageData>,
  pub normal: Rc<HalaImageData>,
  pub occlusion: Rc<HalaImageData>,
  pub emissive: Rc<HalaImageData>,
}

impl HalaMaterialImages {
  /// Get the images in binding order.
  /// return: The images.
  pub fn as_array(&self) -> [&Rc<HalaImageData>; 5] {
    [&self.base_color, &self.metallic_roughness, &self.normal, &self.occlusion, &self.emissive]
  }
}

/// The implementation of the material.
impl HalaMaterial {
  /// Bind the material to the shared images.
  /// Base color, metallic-roughness and normal images are mandatory.
  /// param images: The image table of the scene.
  /// param defaults: The fallback images for occlusion and emissive.
  /// return: The bound images.
  pub fn bind(&self, images: &[Rc<HalaImageData>], defaults: &HalaDefaultImages) -> Result<HalaMaterialImages, HalaSceneError> {
    let required = |index: Option<u32>, what: &str| -> Result<Rc<HalaImageData>, HalaSceneError> {
      let index = index
        .ok_or(HalaSceneError::new(&format!("Material \"{}\" has no {} image.", self.name, what), None))?;
      Self::lookup(images, index, &self.name)
    };
    let optional = |index: Option<u32>, default: &Rc<HalaImageData>| -> Result<Rc<HalaImageData>, HalaSceneError> {
      match index {
        Some(index) => Self::lookup(images, index, &self.name),
        None => Ok(Rc::clone(default)),
      }
    };

    Ok(HalaMaterialImages {
      base_color: required(self.base_color_image_index, "base color")?,
      metallic_roughness: required(self.metallic_roughness_image_index, "metallic roughness")?,
      normal: required(self.normal_image_index, "normal")?,
      occlusion: optional(self.occlusion_image_index, &defaults.occlusion)?,
      emissive: optional(self.emissive_image_index, &defaults.emissive)?,
    })
  }

  fn lookup(images: &[Rc<HalaImageData>], index: u32, name: &str) -> Result<Rc<HalaImageData>, HalaSceneError> {
    images.get(index as usize)
      .map(Rc::clone)
      .ok_or(HalaSceneError::new(&format!("Material \"{}\" references missing image {}.", name, index), None))
  }
}
