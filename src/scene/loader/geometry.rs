use glam::{
  Vec2,
  Vec3,
  Vec4,
};
use gltf::accessor::{
  DataType,
  Dimensions,
};
use gltf::mesh::util::ReadIndices;

use crate::error::HalaSceneError;
use crate::scene::HalaVertex;
use crate::scene::cpu::mesh::HalaPrimitive;

/// Check the element type of an accessor before handing it to a reader.
/// param accessor: The accessor.
/// param what: The name of the data, used in the error message.
/// param data_types: The accepted component types.
/// param dimensions: The expected dimensions.
/// return: The result.
pub(super) fn check_accessor(
  accessor: &gltf::Accessor,
  what: &str,
  data_types: &[DataType],
  dimensions: Dimensions,
) -> Result<(), HalaSceneError> {
  if !data_types.contains(&accessor.data_type()) || accessor.dimensions() != dimensions {
    return Err(HalaSceneError::new(
      &format!(
        "The {} accessor {} has type {:?} {:?}, expected {:?} of {:?}.",
        what, accessor.index(), accessor.data_type(), accessor.dimensions(), dimensions, data_types),
      None));
  }
  Ok(())
}

/// Load one primitive into the global vertex and index buffers.
/// The indices are offset by the first vertex of the primitive, so one buffer binding draws the whole scene.
/// param primitive: The glTF primitive.
/// param buffers: The glTF buffers.
/// param vertices: The global vertex buffer.
/// param indices: The global index buffer.
/// return: The draw range of the primitive.
pub fn load_primitive(
  primitive: &gltf::Primitive,
  buffers: &[gltf::buffer::Data],
  vertices: &mut Vec<HalaVertex>,
  indices: &mut Vec<u32>,
) -> Result<HalaPrimitive, HalaSceneError> {
  let first_index = indices.len() as u32;
  let first_vertex = vertices.len() as u32;

  let position_accessor = primitive.get(&gltf::Semantic::Positions)
    .ok_or(HalaSceneError::new("Read positions from primitive failed.", None))?;
  check_accessor(&position_accessor, "position", &[DataType::F32], Dimensions::Vec3)?;
  if let Some(accessor) = primitive.get(&gltf::Semantic::Normals) {
    check_accessor(&accessor, "normal", &[DataType::F32], Dimensions::Vec3)?;
  }
  if let Some(accessor) = primitive.get(&gltf::Semantic::TexCoords(0)) {
    check_accessor(&accessor, "tex_coord", &[DataType::U8, DataType::U16, DataType::F32], Dimensions::Vec2)?;
  }
  if let Some(accessor) = primitive.get(&gltf::Semantic::Tangents) {
    check_accessor(&accessor, "tangent", &[DataType::F32], Dimensions::Vec4)?;
  }
  if let Some(accessor) = primitive.indices() {
    if accessor.dimensions() != Dimensions::Scalar
      || !matches!(accessor.data_type(), DataType::U8 | DataType::U16 | DataType::U32) {
      return Err(HalaSceneError::new(
        &format!("Index component type {:?} not supported.", accessor.data_type()),
        None));
    }
  }

  let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

  let positions = reader.read_positions()
    .ok_or(HalaSceneError::new("Read positions from primitive failed.", None))?
    .map(Vec3::from)
    .collect::<Vec<_>>();
  let normals = reader.read_normals()
    .map(|normals| normals.map(Vec3::from).collect::<Vec<_>>());
  let tex_coords = reader.read_tex_coords(0)
    .map(|tex_coords| tex_coords.into_f32().map(Vec2::from).collect::<Vec<_>>());
  let tangents = reader.read_tangents()
    .map(|tangents| tangents.map(Vec4::from).collect::<Vec<_>>());

  let vertex_count = positions.len();
  for (i, position) in positions.into_iter().enumerate() {
    let normal = normals.as_ref().and_then(|normals| normals.get(i)).copied().unwrap_or(Vec3::ZERO);
    vertices.push(HalaVertex {
      position,
      normal: normal.normalize_or_zero(),
      tex_coord: tex_coords.as_ref().and_then(|tex_coords| tex_coords.get(i)).copied().unwrap_or(Vec2::ZERO),
      tangent: tangents.as_ref().and_then(|tangents| tangents.get(i)).copied().unwrap_or(Vec4::ZERO),
      ..Default::default()
    });
  }

  let primitive_indices = match reader.read_indices() {
    Some(ReadIndices::U8(iter)) => iter.map(u32::from).collect::<Vec<_>>(),
    Some(ReadIndices::U16(iter)) => iter.map(u32::from).collect::<Vec<_>>(),
    Some(ReadIndices::U32(iter)) => iter.collect::<Vec<_>>(),
    None if primitive.indices().is_some() => {
      return Err(HalaSceneError::new("Read indices from primitive failed.", None));
    },
    // Non-indexed primitives draw their vertices in order.
    None => (0..vertex_count as u32).collect::<Vec<_>>(),
  };
  indices.reserve(primitive_indices.len());
  for index in primitive_indices {
    let index = index.checked_add(first_vertex)
      .ok_or(HalaSceneError::new(
        &format!("Index {} overflows when offset by the first vertex {}.", index, first_vertex),
        None))?;
    indices.push(index);
  }

  Ok(HalaPrimitive {
    first_index,
    index_count: indices.len() as u32 - first_index,
    first_vertex,
    vertex_count: vertex_count as u32,
    material_index: primitive.material().index().map(|index| index as u32),
  })
}
