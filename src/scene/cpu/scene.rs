use std::path::Path;
use std::rc::Rc;
use std::collections::BTreeMap;

use glam::Mat4;

use crate::error::HalaSceneError;
use crate::config::HalaSceneConfig;
use crate::scene::HalaVertex;
use super::node::HalaNode;
use super::material::{
  HalaMaterial,
  HalaMaterialImages,
  HalaDefaultImages,
};
use super::image_data::HalaImageData;
use super::animation::HalaAnimation;
use super::super::loader::HalaGltfLoader;

/// The per-node uniform consumed by the rendering layer.
#[repr(C, align(4))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalaNodeUniform {
  // The model matrix.
  pub m_mtx: glam::Mat4,
}

/// A node with primitives to draw and its cached world transform.
pub struct HalaMeshNode {
  /// The node id in the node arena.
  pub node: usize,
  pub uniform: HalaNodeUniform,
}

/// A scene is a node forest with its geometry, materials, images and animations.
pub struct HalaScene {
  /// The node arena. Parent, children and channel targets are ids into it.
  pub nodes: Vec<HalaNode>,
  pub root_nodes: Vec<usize>,
  /// The nodes owning primitives, children listed before their parents.
  pub mesh_nodes: Vec<HalaMeshNode>,
  pub vertices: Vec<HalaVertex>,
  pub indices: Vec<u32>,
  pub materials: Vec<HalaMaterial>,
  pub texture2image_mapping: BTreeMap<u32, u32>,
  pub images: Vec<Rc<HalaImageData>>,
  pub animations: Vec<HalaAnimation>,
}

/// The Drop implementation of the scene.
impl Drop for HalaScene {
  fn drop(&mut self) {
    log::debug!("A HalaScene dropped.");
  }
}

/// The implementation of the scene.
impl HalaScene {
  /// Create a new scene from glTF file.
  /// param path: The path to the glTF file.
  /// return: The scene.
  pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, HalaSceneError> {
    // Check the file extension.
    let path = path.as_ref();
    let extension = path.extension()
      .ok_or(HalaSceneError::new(&format!("Get file \"{:?}\" extension failed.", path), None))?;
    let mut scene = match extension.to_str() {
      // glTF file.
      Some("gltf") | Some("glb") => HalaGltfLoader::load(path),
      // Unsupported file.
      _ => Err(HalaSceneError::new(&format!("Unsupported file \"{:?}\".", path), None)),
    }?;
    scene.update_mesh_transforms();

    log::debug!("A HalaScene created.");
    Ok(scene)
  }

  /// Create a new scene from glTF file and bind all materials.
  /// A scene with a material lacking a mandatory image is rejected here.
  /// param path: The path to the glTF file.
  /// param config: The scene configuration.
  /// return: The scene and the bound images of each material.
  pub fn new_with_config<P: AsRef<Path>>(path: P, config: &HalaSceneConfig) -> Result<(Self, Vec<HalaMaterialImages>), HalaSceneError> {
    let scene = Self::new(path)?;
    let defaults = HalaDefaultImages::new(config)?;
    let bindings = scene.bind_materials(&defaults)?;
    Ok((scene, bindings))
  }

  /// Bind every material to the shared images.
  /// param defaults: The fallback images for occlusion and emissive.
  /// return: The bound images, one entry per material.
  pub fn bind_materials(&self, defaults: &HalaDefaultImages) -> Result<Vec<HalaMaterialImages>, HalaSceneError> {
    self.materials.iter()
      .map(|material| material.bind(&self.images, defaults))
      .collect()
  }

  /// Find the node with the source index in the subtree of the root.
  /// param root: The root node id of the search.
  /// param index: The source node index.
  /// return: The node id if found.
  pub fn find_node(&self, root: usize, index: u32) -> Option<usize> {
    let node = self.nodes.get(root)?;
    if node.index == index {
      return Some(root);
    }
    node.children.iter().find_map(|&child| self.find_node(child, index))
  }

  /// Find the node with the source index in the whole forest.
  /// Only used at load time, the per-frame path goes through node ids.
  /// param index: The source node index.
  /// return: The node id if found.
  pub fn node_from_index(&self, index: u32) -> Option<usize> {
    self.root_nodes.iter().find_map(|&root| self.find_node(root, index))
  }

  /// Get the world transform of the node by walking up to the top-most parent.
  /// param node: The node id.
  /// return: The world transform, None if the node or one of its parents is not in the arena.
  pub fn world_transform(&self, node: usize) -> Option<Mat4> {
    let mut node = self.nodes.get(node)?;
    let mut transform = node.local_transform();
    while let Some(parent) = node.parent {
      node = self.nodes.get(parent)?;
      transform = node.local_transform() * transform;
    }
    Some(transform)
  }

  /// Recompute the world transform of every node with primitives.
  pub fn update_mesh_transforms(&mut self) {
    for idx in 0..self.mesh_nodes.len() {
      match self.world_transform(self.mesh_nodes[idx].node) {
        Some(m_mtx) => self.mesh_nodes[idx].uniform = HalaNodeUniform { m_mtx },
        None => log::warn!("Mesh node {} is not in the node arena.", self.mesh_nodes[idx].node),
      }
    }
  }

  /// Advance the active animation and refresh the transforms.
  /// param active_animation: The index of the animation to play.
  /// param delta_time: The elapsed time in seconds.
  pub fn update_animation(&mut self, active_animation: u32, delta_time: f32) {
    let animation = match self.animations.get_mut(active_animation as usize) {
      Some(animation) => animation,
      None => {
        log::warn!("No animation with index {}.", active_animation);
        return;
      },
    };
    animation.advance(delta_time);
    animation.apply(&mut self.nodes);

    self.update_mesh_transforms();
  }

  /// Find the animation with the name.
  /// param name: The animation name.
  /// return: The animation index if found.
  pub fn animation_index(&self, name: &str) -> Option<u32> {
    self.animations.iter().position(|animation| animation.name == name).map(|idx| idx as u32)
  }
}
