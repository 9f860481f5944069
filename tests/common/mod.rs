#![allow(dead_code)]

use hala_scene::prelude::*;

/// Packs little-endian data into one buffer, keeping every block 4-byte aligned.
#[derive(Default)]
pub struct BufferBuilder {
  pub bytes: Vec<u8>,
}

impl BufferBuilder {
  pub fn push_f32s(&mut self, values: &[f32]) -> (usize, usize) {
    let offset = self.bytes.len();
    for value in values {
      self.bytes.extend_from_slice(&value.to_le_bytes());
    }
    self.finish(offset)
  }

  pub fn push_u32s(&mut self, values: &[u32]) -> (usize, usize) {
    let offset = self.bytes.len();
    for value in values {
      self.bytes.extend_from_slice(&value.to_le_bytes());
    }
    self.finish(offset)
  }

  pub fn push_u16s(&mut self, values: &[u16]) -> (usize, usize) {
    let offset = self.bytes.len();
    for value in values {
      self.bytes.extend_from_slice(&value.to_le_bytes());
    }
    self.finish(offset)
  }

  pub fn push_i16s(&mut self, values: &[i16]) -> (usize, usize) {
    let offset = self.bytes.len();
    for value in values {
      self.bytes.extend_from_slice(&value.to_le_bytes());
    }
    self.finish(offset)
  }

  pub fn push_u8s(&mut self, values: &[u8]) -> (usize, usize) {
    let offset = self.bytes.len();
    self.bytes.extend_from_slice(values);
    self.finish(offset)
  }

  fn finish(&mut self, offset: usize) -> (usize, usize) {
    let length = self.bytes.len() - offset;
    while self.bytes.len() % 4 != 0 {
      self.bytes.push(0);
    }
    (offset, length)
  }
}

pub fn view(buffer_view: (usize, usize)) -> String {
  format!(r#"{{ "buffer": 0, "byteOffset": {}, "byteLength": {} }}"#, buffer_view.0, buffer_view.1)
}

/// Parse and validate the glTF JSON text.
pub fn parse(text: &str) -> anyhow::Result<gltf::Document> {
  Ok(gltf::Gltf::from_slice(text.as_bytes())?.document)
}

/// A three level hierarchy with two meshes, two materials and one animation.
///
/// node 0 "root" (scale 2) -> node 1 "arm" (translation x 1, mesh 0) -> node 2 "hand" (mesh 1).
/// Node 3 is not part of the scene.
pub fn robot_arm() -> (gltf::Document, Vec<gltf::buffer::Data>) {
  let half = std::f32::consts::FRAC_1_SQRT_2;
  let mut buffer = BufferBuilder::default();
  let positions = buffer.push_f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
  let normals = buffer.push_f32s(&[0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0]);
  let short_indices = buffer.push_u16s(&[2, 1, 0]);
  let byte_indices = buffer.push_u8s(&[0, 1, 2]);
  let times = buffer.push_f32s(&[0.0, 1.0]);
  let rotations = buffer.push_f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, half, 0.0, half]);
  let translations = buffer.push_f32s(&[1.0, 0.0, 0.0, 3.0, 0.0, 0.0]);

  let text = format!(r#"{{
    "asset": {{ "version": "2.0" }},
    "scene": 0,
    "scenes": [{{ "name": "main", "nodes": [0] }}],
    "nodes": [
      {{ "name": "root", "scale": [2.0, 2.0, 2.0], "children": [1] }},
      {{ "name": "arm", "translation": [1.0, 0.0, 0.0], "children": [2], "mesh": 0 }},
      {{ "name": "hand", "mesh": 1 }},
      {{ "name": "spare" }}
    ],
    "meshes": [
      {{ "name": "arm", "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0 }}] }},
      {{ "name": "hand", "primitives": [{{ "attributes": {{ "POSITION": 0, "NORMAL": 2 }}, "indices": 3 }}] }}
    ],
    "accessors": [
      {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
      {{ "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }},
      {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
      {{ "bufferView": 3, "componentType": 5121, "count": 3, "type": "SCALAR" }},
      {{ "bufferView": 4, "componentType": 5126, "count": 2, "type": "SCALAR" }},
      {{ "bufferView": 5, "componentType": 5126, "count": 2, "type": "VEC4" }},
      {{ "bufferView": 6, "componentType": 5126, "count": 2, "type": "VEC3" }}
    ],
    "bufferViews": [{}, {}, {}, {}, {}, {}, {}],
    "buffers": [{{ "byteLength": {} }}],
    "images": [{{}}, {{}}],
    "textures": [{{ "source": 0 }}, {{ "source": 1 }}],
    "materials": [
      {{
        "name": "metal",
        "pbrMetallicRoughness": {{
          "baseColorFactor": [0.5, 0.5, 0.5, 1.0],
          "baseColorTexture": {{ "index": 0 }},
          "metallicRoughnessTexture": {{ "index": 1 }},
          "roughnessFactor": 0.25
        }},
        "normalTexture": {{ "index": 1 }}
      }},
      {{
        "name": "flat",
        "pbrMetallicRoughness": {{ "baseColorTexture": {{ "index": 0 }} }},
        "emissiveTexture": {{ "index": 1 }}
      }}
    ],
    "animations": [{{
      "name": "wave",
      "samplers": [
        {{ "input": 4, "output": 5, "interpolation": "LINEAR" }},
        {{ "input": 4, "output": 6 }}
      ],
      "channels": [
        {{ "sampler": 0, "target": {{ "node": 1, "path": "rotation" }} }},
        {{ "sampler": 1, "target": {{ "node": 2, "path": "translation" }} }},
        {{ "sampler": 1, "target": {{ "node": 3, "path": "translation" }} }}
      ]
    }}]
  }}"#,
    view(positions), view(normals), view(short_indices), view(byte_indices),
    view(times), view(rotations), view(translations),
    buffer.bytes.len(),
  );

  let document = parse(&text).expect("The robot arm document is valid glTF.");
  (document, vec![gltf::buffer::Data(buffer.bytes)])
}

pub fn images() -> Vec<HalaImageData> {
  vec![
    HalaImageData::new_with_color(2, 2, [255, 0, 0, 255]),
    HalaImageData::new_with_color(2, 2, [0, 255, 0, 255]),
  ]
}

pub fn small_config() -> HalaSceneConfig {
  HalaSceneConfig::from_json(r#"{ "default_image_size": 4 }"#).expect("The config is valid JSON.")
}
