/// A primitive is one indexed draw range in the global index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalaPrimitive {
  pub first_index: u32,
  pub index_count: u32,
  pub first_vertex: u32,
  pub vertex_count: u32,
  pub material_index: Option<u32>,
}

/// The implementation of the primitive.
impl HalaPrimitive {
  /// Get the index range of the primitive in the global index buffer.
  /// return: The half-open range.
  pub fn index_range(&self) -> std::ops::Range<usize> {
    self.first_index as usize..(self.first_index + self.index_count) as usize
  }
}

/// A mesh is a collection of primitives owned by one node.
#[derive(Debug, Clone, Default)]
pub struct HalaMesh {
  pub primitives: Vec<HalaPrimitive>,
}
