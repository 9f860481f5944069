use std::path::{
  Path,
  PathBuf,
};

use serde::{
  Deserialize, Serialize
};

use crate::error::HalaSceneError;

fn default_image_size() -> u32 {
  2048
}

fn default_occlusion_color() -> [u8; 4] {
  [255, 255, 255, 255]
}

fn default_emissive_color() -> [u8; 4] {
  [0, 0, 0, 255]
}

/// The scene configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HalaSceneConfig {
  #[serde(default)]
  pub active_animation: u32,
  #[serde(default)]
  pub paused: bool,
  #[serde(default = "default_image_size")]
  pub default_image_size: u32,
  #[serde(default = "default_occlusion_color")]
  pub default_occlusion_color: [u8; 4],
  #[serde(default = "default_emissive_color")]
  pub default_emissive_color: [u8; 4],
  #[serde(default)]
  pub default_occlusion_image: Option<PathBuf>,
  #[serde(default)]
  pub default_emissive_image: Option<PathBuf>,
}

impl Default for HalaSceneConfig {
  fn default() -> Self {
    HalaSceneConfig {
      active_animation: 0,
      paused: false,
      default_image_size: default_image_size(),
      default_occlusion_color: default_occlusion_color(),
      default_emissive_color: default_emissive_color(),
      default_occlusion_image: None,
      default_emissive_image: None,
    }
  }
}

/// The implementation of the scene configuration.
impl HalaSceneConfig {
  /// Load the configuration from a JSON file.
  /// param path: The path of the file.
  /// return: The configuration.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HalaSceneError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
      .map_err(|err| HalaSceneError::new(&format!("Read config file \"{:?}\" failed.", path), Some(Box::new(err))))?;
    Self::from_json(&text)
  }

  /// Parse the configuration from a JSON string.
  /// param text: The JSON text.
  /// return: The configuration.
  pub fn from_json(text: &str) -> Result<Self, HalaSceneError> {
    serde_json::from_str(text)
      .map_err(|err| HalaSceneError::new("Parse scene config failed.", Some(Box::new(err))))
  }
}
