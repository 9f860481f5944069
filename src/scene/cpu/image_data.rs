use std::path::Path;

use image::GenericImageView;

use crate::error::HalaSceneError;

/// The pixel format of the image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalaImageFormat(u8);
impl HalaImageFormat {
  pub const R8_UNORM: Self = Self(0);
  pub const R8G8_UNORM: Self = Self(1);
  pub const R8G8B8A8_UNORM: Self = Self(2);
  pub const R16_UNORM: Self = Self(3);
  pub const R16G16_UNORM: Self = Self(4);
  pub const R16G16B16_UNORM: Self = Self(5);
  pub const R16G16B16A16_UNORM: Self = Self(6);
  pub const R32G32B32_SFLOAT: Self = Self(7);
  pub const R32G32B32A32_SFLOAT: Self = Self(8);
}

/// The decoded pixels of one image.
/// Images are shared by materials, so a scene holds them as `Rc<HalaImageData>`.
#[derive(Debug)]
pub struct HalaImageData {
  pub format: HalaImageFormat,
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<u8>,
}

impl HalaImageData {
  /// Create a new image filled with one color.
  /// param width: The width.
  /// param height: The height.
  /// param color: The RGBA color.
  /// return: The image.
  pub fn new_with_color(width: u32, height: u32, color: [u8; 4]) -> Self {
    let num_of_pixels = width as usize * height as usize;
    let mut pixels = Vec::with_capacity(num_of_pixels * 4);
    for _ in 0..num_of_pixels {
      pixels.extend_from_slice(&color);
    }

    Self {
      format: HalaImageFormat::R8G8B8A8_UNORM,
      width,
      height,
      pixels,
    }
  }

  /// Create a new image with the given file path.
  /// The image is always converted to RGBA8.
  /// param path: The file path.
  /// return: The result.
  pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, HalaSceneError> {
    let path = path.as_ref();

    let img = image::open(path)
      .map_err(|e| HalaSceneError::new(&format!("Failed to open image \"{}\".", path.to_string_lossy()), Some(Box::new(e))))?;
    let (width, height) = img.dimensions();

    Ok(Self {
      format: HalaImageFormat::R8G8B8A8_UNORM,
      width,
      height,
      pixels: img.into_rgba8().into_raw(),
    })
  }

  /// Create a new image from the decoded glTF image.
  /// param image_data: The glTF image data.
  /// return: The image.
  pub fn new_with_gltf(image_data: &gltf::image::Data) -> Self {
    let format = match image_data.format {
      gltf::image::Format::R8 => HalaImageFormat::R8_UNORM,
      gltf::image::Format::R8G8 => HalaImageFormat::R8G8_UNORM,
      gltf::image::Format::R8G8B8 => HalaImageFormat::R8G8B8A8_UNORM, // Widened below.
      gltf::image::Format::R8G8B8A8 => HalaImageFormat::R8G8B8A8_UNORM,
      gltf::image::Format::R16 => HalaImageFormat::R16_UNORM,
      gltf::image::Format::R16G16 => HalaImageFormat::R16G16_UNORM,
      gltf::image::Format::R16G16B16 => HalaImageFormat::R16G16B16_UNORM,
      gltf::image::Format::R16G16B16A16 => HalaImageFormat::R16G16B16A16_UNORM,
      gltf::image::Format::R32G32B32FLOAT => HalaImageFormat::R32G32B32_SFLOAT,
      gltf::image::Format::R32G32B32A32FLOAT => HalaImageFormat::R32G32B32A32_SFLOAT,
    };

    let pixels = if image_data.format == gltf::image::Format::R8G8B8 {
      rgb_to_rgba(&image_data.pixels)
    } else {
      image_data.pixels.clone()
    };

    Self {
      format,
      width: image_data.width,
      height: image_data.height,
      pixels,
    }
  }

  /// Get the size of the pixel data in bytes.
  /// return: The number of bytes.
  pub fn num_of_bytes(&self) -> usize {
    self.pixels.len()
  }
}

/// Most devices do NOT support RGB formats, so widen them to RGBA with an opaque alpha.
/// param rgb: The RGB pixels.
/// return: The RGBA pixels.
fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
  let mut pixels = Vec::with_capacity(rgb.len() / 3 * 4);
  for texel in rgb.chunks_exact(3) {
    pixels.extend_from_slice(texel);
    pixels.push(255);
  }
  pixels
}
