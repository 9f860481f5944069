pub use crate::error::HalaSceneError;
pub use crate::config::HalaSceneConfig;
pub use crate::scene::HalaVertex;
pub use crate::scene::loader::HalaGltfLoader;
pub use crate::scene::cpu::{
  HalaScene,
  node::HalaNode,
  mesh::{HalaMesh, HalaPrimitive},
  material::{HalaMaterial, HalaMaterialImages, HalaDefaultImages},
  image_data::{HalaImageData, HalaImageFormat},
  animation::{
    HalaAnimation,
    HalaAnimationChannel,
    HalaAnimationPath,
    HalaAnimationSampler,
    HalaInterpolation,
  },
  playback::HalaPlayback,
  scene::{HalaMeshNode, HalaNodeUniform},
};
