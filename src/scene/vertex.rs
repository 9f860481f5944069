use glam::{
  Vec2,
  Vec3,
  Vec4,
};

/// The vertex shared by every primitive of a scene.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalaVertex {
  pub position: Vec3,
  pub normal: Vec3,
  pub tex_coord: Vec2,
  pub color: Vec3,
  pub tangent: Vec4,
}

/// The default implementation of the vertex.
impl Default for HalaVertex {
  fn default() -> Self {
    Self {
      position: Vec3::ZERO,
      normal: Vec3::ZERO,
      tex_coord: Vec2::ZERO,
      color: Vec3::ONE,
      tangent: Vec4::ZERO,
    }
  }
}
