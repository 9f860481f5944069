use glam::{
  Mat4,
  Quat,
  Vec3,
};

use super::mesh::HalaMesh;

/// A node is a positioned entity of the scene hierarchy.
/// Parent and children are ids into the node arena of the owning scene.
pub struct HalaNode {
  pub name: String,
  /// The node index in the source document.
  pub index: u32,
  pub parent: Option<usize>,
  pub children: Vec<usize>,

  pub translation: Vec3,
  pub rotation: Quat,
  pub scale: Vec3,
  /// The explicit matrix, applied after TRS.
  pub matrix: Mat4,

  pub mesh: Option<HalaMesh>,
}

/// The default implementation of the node.
impl Default for HalaNode {
  fn default() -> Self {
    Self {
      name: String::new(),
      index: u32::MAX,
      parent: None,
      children: Vec::new(),
      translation: Vec3::ZERO,
      rotation: Quat::IDENTITY,
      scale: Vec3::ONE,
      matrix: Mat4::IDENTITY,
      mesh: None,
    }
  }
}

/// The implementation of the node.
impl HalaNode {
  /// Get the local transform from the current translation, rotation, scale and matrix.
  /// These are changed by the animation, so the result is never cached.
  /// return: The local transform.
  pub fn local_transform(&self) -> Mat4 {
    Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation) * self.matrix
  }

  /// Check if the node is a root node.
  /// return: True if the node has no parent, false otherwise.
  pub fn is_root(&self) -> bool {
    self.parent.is_none()
  }

  /// Check if the node has any primitive to draw.
  /// return: True if the node owns a non-empty mesh, false otherwise.
  pub fn has_primitives(&self) -> bool {
    self.mesh.as_ref().map_or(false, |mesh| !mesh.primitives.is_empty())
  }
}
