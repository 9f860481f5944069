use std::path::Path;
use std::rc::Rc;
use std::collections::BTreeMap;

use glam::{
  Mat4,
  Quat,
  Vec3,
  Vec4,
};
use gltf::accessor::{
  DataType,
  Dimensions,
};
use gltf::animation::Property;
use gltf::animation::util::ReadOutputs;

use crate::error::HalaSceneError;
use crate::scene::HalaVertex;
use super::geometry;
use super::super::{
  cpu::scene::{HalaScene, HalaMeshNode, HalaNodeUniform},
  cpu::node::HalaNode,
  cpu::mesh::HalaMesh,
  cpu::material::HalaMaterial,
  cpu::image_data::HalaImageData,
  cpu::animation::{HalaAnimation, HalaAnimationSampler, HalaAnimationChannel},
};

/// The glTF loader.
pub struct HalaGltfLoader;

/// The state shared by the recursive node loading.
struct NodeLoadContext<'a> {
  document: &'a gltf::Document,
  buffers: &'a [gltf::buffer::Data],
  nodes: Vec<HalaNode>,
  mesh_nodes: Vec<HalaMeshNode>,
  vertices: Vec<HalaVertex>,
  indices: Vec<u32>,
  visited: Vec<bool>,
}

/// The implementation of the glTF loader.
impl HalaGltfLoader {
  /// Load the glTF file from the given path.
  /// param path The path of the glTF file.
  /// return The loaded scene.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<HalaScene, HalaSceneError> {
    let path = path.as_ref();
    let (document, buffers, image_data) = gltf::import(path)
      .map_err(|err| HalaSceneError::new(&format!("Load glTF file \"{:?}\" failed.", path), Some(Box::new(err))))?;

    let mut images = Vec::with_capacity(image_data.len());
    for (index, data) in image_data.iter().enumerate() {
      log::debug!("Loading image {}.", index);
      images.push(HalaImageData::new_with_gltf(data));
    }

    Self::load_document(&document, &buffers, images)
  }

  /// Load the scene from the validated glTF document.
  /// param document The glTF document.
  /// param buffers The binary buffers of the document.
  /// param images The decoded images of the document.
  /// return The loaded scene.
  pub fn load_document(document: &gltf::Document, buffers: &[gltf::buffer::Data], images: Vec<HalaImageData>) -> Result<HalaScene, HalaSceneError> {
    // Load all images and textures.
    let images = images.into_iter().map(Rc::new).collect::<Vec<_>>();
    let mut texture2image_mapping = BTreeMap::new();
    for texture in document.textures() {
      let source = texture.source().index();
      if source >= images.len() {
        return Err(HalaSceneError::new(&format!("Texture {} references missing image {}.", texture.index(), source), None));
      }
      texture2image_mapping.insert(texture.index() as u32, source as u32);
    }

    // Load all materials.
    let mut materials = Vec::with_capacity(document.materials().len());
    for material in document.materials() {
      materials.push(Self::load_material(&material, &texture2image_mapping));
    }

    // Load all nodes of the scene.
    let scene = document.default_scene()
      .or_else(|| document.scenes().next())
      .ok_or(HalaSceneError::new("No scene in glTF document.", None))?;
    if document.scenes().len() > 1 {
      log::warn!("More than one scene in glTF document. Only the scene {} will be loaded.", scene.index());
    }
    log::debug!("Loading scene \"{}\".", scene.name().unwrap_or("<Unnamed>"));

    let mut context = NodeLoadContext {
      document,
      buffers,
      nodes: Vec::with_capacity(document.nodes().len()),
      mesh_nodes: Vec::new(),
      vertices: Vec::new(),
      indices: Vec::new(),
      visited: vec![false; document.nodes().len()],
    };
    let mut root_nodes = Vec::with_capacity(scene.nodes().len());
    for node in scene.nodes() {
      root_nodes.push(Self::load_node(&mut context, &node, None)?);
    }

    let mut scene = HalaScene {
      nodes: context.nodes,
      root_nodes,
      mesh_nodes: context.mesh_nodes,
      vertices: context.vertices,
      indices: context.indices,
      materials,
      texture2image_mapping,
      images,
      animations: Vec::new(),
    };

    // Load all animations, the channels are bound to the loaded nodes.
    for animation in document.animations() {
      let loaded_animation = Self::load_animation(document, &animation, buffers, &scene)?;
      scene.animations.push(loaded_animation);
    }

    scene.update_mesh_transforms();
    Ok(scene)
  }

  /// Load the node and its subtree.
  /// Children are loaded before the geometry of the node, and a node with primitives is
  /// listed after its descendants.
  /// param context The load context.
  /// param node The glTF node.
  /// param parent The parent node id.
  /// return The node id.
  fn load_node(context: &mut NodeLoadContext, node: &gltf::Node, parent: Option<usize>) -> Result<usize, HalaSceneError> {
    let node_index = node.index();
    if std::mem::replace(&mut context.visited[node_index], true) {
      return Err(HalaSceneError::new(&format!("Node {} is reachable more than once.", node_index), None));
    }

    let mut loaded_node = HalaNode {
      name: node.name().unwrap_or("<Unnamed>").to_owned(),
      index: node_index as u32,
      parent,
      ..Default::default()
    };
    match node.transform() {
      gltf::scene::Transform::Decomposed { translation, rotation, scale } => {
        loaded_node.translation = Vec3::from(translation);
        loaded_node.rotation = Quat::from_array(rotation);
        loaded_node.scale = Vec3::from(scale);
      },
      gltf::scene::Transform::Matrix { matrix } => {
        loaded_node.matrix = Mat4::from_cols_array_2d(&matrix);
        // TRS written next to a matrix is kept and applied before it.
        if let Some(json) = context.document.as_json().nodes.get(node_index) {
          if let Some(translation) = json.translation {
            loaded_node.translation = Vec3::from(translation);
          }
          if let Some(rotation) = json.rotation {
            loaded_node.rotation = Quat::from_array(rotation.0);
          }
          if let Some(scale) = json.scale {
            loaded_node.scale = Vec3::from(scale);
          }
        }
      },
    }

    let current_index = context.nodes.len();
    context.nodes.push(loaded_node);

    for child in node.children() {
      let child = Self::load_node(context, &child, Some(current_index))?;
      context.nodes[current_index].children.push(child);
    }

    // If the node has a mesh, load its primitives into the global buffers.
    if let Some(mesh) = node.mesh() {
      let mesh_name = mesh.name().unwrap_or("<Unnamed>");
      log::debug!("Loading mesh \"{}\".", mesh_name);

      let mut loaded_primitives = Vec::with_capacity(mesh.primitives().len());
      for primitive in mesh.primitives() {
        log::debug!("Loading primitive {} from mesh \"{}\".", primitive.index(), mesh_name);
        let loaded_primitive = geometry::load_primitive(&primitive, context.buffers, &mut context.vertices, &mut context.indices)
          .map_err(|err| HalaSceneError::new(
            &format!("Load primitive {} from mesh \"{}\" failed.", primitive.index(), mesh_name),
            Some(Box::new(err))))?;
        loaded_primitives.push(loaded_primitive);
      }

      context.nodes[current_index].mesh = Some(HalaMesh {
        primitives: loaded_primitives,
      });
      if context.nodes[current_index].has_primitives() {
        context.mesh_nodes.push(HalaMeshNode {
          node: current_index,
          uniform: HalaNodeUniform { m_mtx: Mat4::IDENTITY },
        });
      }
    }

    Ok(current_index)
  }

  /// Load the material.
  /// param material The glTF material.
  /// param texture2image_mapping The texture to image mapping.
  /// return The loaded material.
  fn load_material(material: &gltf::Material, texture2image_mapping: &BTreeMap<u32, u32>) -> HalaMaterial {
    let name = match (material.name(), material.index()) {
      (Some(name), _) => name.to_owned(),
      (None, Some(index)) => format!("<Material {}>", index),
      (None, None) => "<Default>".to_owned(),
    };
    log::debug!("Loading material \"{}\".", name);

    let image_index = |texture: Option<gltf::Texture>| -> Option<u32> {
      texture.and_then(|texture| texture2image_mapping.get(&(texture.index() as u32)).copied())
    };

    let pbr = material.pbr_metallic_roughness();
    HalaMaterial {
      base_color_factor: Vec4::from(pbr.base_color_factor()),
      metallic_factor: pbr.metallic_factor(),
      roughness_factor: pbr.roughness_factor(),
      emissive_factor: Vec3::from(material.emissive_factor()),
      base_color_image_index: image_index(pbr.base_color_texture().map(|info| info.texture())),
      metallic_roughness_image_index: image_index(pbr.metallic_roughness_texture().map(|info| info.texture())),
      normal_image_index: image_index(material.normal_texture().map(|info| info.texture())),
      occlusion_image_index: image_index(material.occlusion_texture().map(|info| info.texture())),
      emissive_image_index: image_index(material.emissive_texture().map(|info| info.texture())),
      name,
    }
  }

  /// Load the animation and bind its channels to the loaded nodes.
  /// param document The glTF document.
  /// param animation The glTF animation.
  /// param buffers The glTF buffers.
  /// param scene The scene with the loaded nodes.
  /// return The loaded animation.
  fn load_animation(
    document: &gltf::Document,
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    scene: &HalaScene,
  ) -> Result<HalaAnimation, HalaSceneError> {
    let name = animation.name().unwrap_or("<Unnamed>");
    log::debug!("Loading animation \"{}\".", name);
    let get_buffer_data = |buffer: gltf::Buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice());

    // Read sampler keyframe input time values.
    let mut samplers = Vec::new();
    for sampler in animation.samplers() {
      let input = sampler.input();
      geometry::check_accessor(&input, "animation input", &[DataType::F32], Dimensions::Scalar)?;
      let inputs = gltf::accessor::Iter::<f32>::new(input, get_buffer_data)
        .ok_or(HalaSceneError::new(
          &format!("Read inputs of sampler {} from animation \"{}\" failed.", sampler.index(), name),
          None))?
        .collect::<Vec<_>>();
      samplers.push(HalaAnimationSampler {
        interpolation: sampler.interpolation().into(),
        inputs,
        outputs: Vec::new(),
      });
    }

    let json_channels = document.as_json().animations.get(animation.index()).map(|json| &json.channels);
    let mut channels = Vec::new();
    for channel in animation.channels() {
      // The target node is not covered by the document validation.
      let target_index = json_channels
        .and_then(|json| json.get(channel.index()))
        .map(|json| json.target.node.value())
        .filter(|&index| index < document.nodes().len());
      let node = match target_index.and_then(|index| scene.node_from_index(index as u32)) {
        Some(node) => node,
        None => {
          log::warn!("Animation \"{}\" channel targets node {:?} which is not in the scene.", name, target_index);
          continue;
        },
      };

      let property = channel.target().property();
      let sampler_index = channel.sampler().index();
      let sampler = samplers.get_mut(sampler_index)
        .ok_or(HalaSceneError::new(
          &format!("Animation \"{}\" channel references missing sampler {}.", name, sampler_index),
          None))?;
      if sampler.outputs.is_empty() {
        sampler.outputs = Self::read_outputs(name, &channel, property, buffers)?;
      }

      channels.push(HalaAnimationChannel {
        path: property.into(),
        node,
        sampler_index: sampler_index as u32,
      });
    }

    Ok(HalaAnimation::new(name, samplers, channels))
  }

  /// Read the keyframe output values of the sampler driving the channel.
  /// 3-vectors are extended with w = 0, an output of the wrong type gives no values.
  /// param name The animation name.
  /// param channel The glTF channel.
  /// param property The animated property.
  /// param buffers The glTF buffers.
  /// return The output values.
  fn read_outputs(
    name: &str,
    channel: &gltf::animation::Channel,
    property: Property,
    buffers: &[gltf::buffer::Data],
  ) -> Result<Vec<Vec4>, HalaSceneError> {
    let output = channel.sampler().output();
    let supported = match property {
      Property::Translation | Property::Scale => {
        output.data_type() == DataType::F32 && output.dimensions() == Dimensions::Vec3
      },
      Property::Rotation => {
        output.data_type() != DataType::U32 && output.dimensions() == Dimensions::Vec4
      },
      Property::MorphTargetWeights => false,
    };
    if !supported {
      log::warn!(
        "Animation \"{}\" has sampler output of unknown type {:?} {:?} for {:?}.",
        name, output.data_type(), output.dimensions(), property);
      return Ok(Vec::new());
    }

    let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let outputs = match reader.read_outputs() {
      Some(ReadOutputs::Translations(values)) => values.map(|value| Vec3::from(value).extend(0.0)).collect(),
      Some(ReadOutputs::Scales(values)) => values.map(|value| Vec3::from(value).extend(0.0)).collect(),
      Some(ReadOutputs::Rotations(values)) => values.into_f32().map(Vec4::from).collect(),
      Some(ReadOutputs::MorphTargetWeights(_)) => Vec::new(),
      None => {
        return Err(HalaSceneError::new(
          &format!("Read outputs of sampler {} from animation \"{}\" failed.", channel.sampler().index(), name),
          None));
      },
    };
    Ok(outputs)
  }
}
