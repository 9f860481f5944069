use glam::{
  Quat,
  Vec4,
  Vec4Swizzles,
};

use super::node::HalaNode;

/// The interpolation mode of an animation sampler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HalaInterpolation {
  #[default]
  Linear,
  Step,
  CubicSpline,
}

impl std::convert::From<gltf::animation::Interpolation> for HalaInterpolation {
  fn from(value: gltf::animation::Interpolation) -> Self {
    match value {
      gltf::animation::Interpolation::Linear => Self::Linear,
      gltf::animation::Interpolation::Step => Self::Step,
      gltf::animation::Interpolation::CubicSpline => Self::CubicSpline,
    }
  }
}

/// The node property driven by an animation channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalaAnimationPath {
  Translation,
  Rotation,
  Scale,
  Unsupported,
}

impl std::convert::From<gltf::animation::Property> for HalaAnimationPath {
  fn from(value: gltf::animation::Property) -> Self {
    match value {
      gltf::animation::Property::Translation => Self::Translation,
      gltf::animation::Property::Rotation => Self::Rotation,
      gltf::animation::Property::Scale => Self::Scale,
      gltf::animation::Property::MorphTargetWeights => Self::Unsupported,
    }
  }
}

/// The keyframes of one animated property.
pub struct HalaAnimationSampler {
  pub interpolation: HalaInterpolation,
  /// Keyframe times in seconds, strictly increasing.
  pub inputs: Vec<f32>,
  /// Keyframe values, 3-vectors are stored with w = 0.
  pub outputs: Vec<Vec4>,
}

/// The implementation of the animation sampler.
impl HalaAnimationSampler {
  /// Find the keyframe pair bracketing the time.
  /// Both bounds are inclusive, when two pairs match the later one is returned.
  /// param time: The time in seconds.
  /// return: The index of the first keyframe of the pair and the interpolation fraction.
  pub fn bracket(&self, time: f32) -> Option<(usize, f32)> {
    let num_of_pairs = self.inputs.len().saturating_sub(1);
    (0..num_of_pairs).rev()
      .find(|&i| time >= self.inputs[i] && time <= self.inputs[i + 1])
      .map(|i| {
        let t0 = self.inputs[i];
        let t1 = self.inputs[i + 1];
        (i, (time - t0) / (t1 - t0))
      })
  }
}

/// Binds one sampler to one property of one node.
pub struct HalaAnimationChannel {
  pub path: HalaAnimationPath,
  /// The target node id in the node arena.
  pub node: usize,
  pub sampler_index: u32,
}

/// An animation clip.
pub struct HalaAnimation {
  pub name: String,
  pub samplers: Vec<HalaAnimationSampler>,
  pub channels: Vec<HalaAnimationChannel>,
  pub start: f32,
  pub end: f32,
  pub current_time: f32,
}

/// The implementation of the animation clip.
impl HalaAnimation {
  /// Create a new animation clip.
  /// The start and end times are the bounds of all sampler inputs.
  /// param name: The name.
  /// param samplers: The samplers.
  /// param channels: The channels.
  /// return: The animation clip.
  pub fn new(name: &str, samplers: Vec<HalaAnimationSampler>, channels: Vec<HalaAnimationChannel>) -> Self {
    let mut start = f32::MAX;
    let mut end = f32::MIN;
    for input in samplers.iter().flat_map(|sampler| sampler.inputs.iter()) {
      start = start.min(*input);
      end = end.max(*input);
    }
    if start > end {
      start = 0.0;
      end = 0.0;
    }

    Self {
      name: name.to_owned(),
      samplers,
      channels,
      start,
      end,
      current_time: 0.0,
    }
  }

  /// Rewind the clip.
  pub fn reset(&mut self) {
    self.current_time = 0.0;
  }

  /// Advance the clock of the clip.
  /// The time wraps back once when it passes the end.
  /// param delta_time: The elapsed time in seconds.
  pub fn advance(&mut self, delta_time: f32) {
    self.current_time += delta_time;
    if self.current_time > self.end {
      self.current_time -= self.end;
    }
  }

  /// Write the sampled values at the current time into the target nodes.
  /// param nodes: The node arena.
  pub fn apply(&self, nodes: &mut [HalaNode]) {
    for channel in self.channels.iter() {
      let sampler = match self.samplers.get(channel.sampler_index as usize) {
        Some(sampler) => sampler,
        None => continue,
      };
      if sampler.interpolation != HalaInterpolation::Linear {
        log::warn!("Animation \"{}\" only supports linear interpolation, got {:?}.", self.name, sampler.interpolation);
        continue;
      }
      if sampler.outputs.len() < sampler.inputs.len() {
        continue;
      }
      let node = match nodes.get_mut(channel.node) {
        Some(node) => node,
        None => continue,
      };

      if let Some((i, a)) = sampler.bracket(self.current_time) {
        let v0 = sampler.outputs[i];
        let v1 = sampler.outputs[i + 1];
        match channel.path {
          HalaAnimationPath::Translation => node.translation = v0.lerp(v1, a).xyz(),
          HalaAnimationPath::Rotation => {
            let q0 = Quat::from_vec4(v0);
            let q1 = Quat::from_vec4(v1);
            node.rotation = q0.slerp(q1, a).normalize();
          },
          HalaAnimationPath::Scale => node.scale = v0.lerp(v1, a).xyz(),
          HalaAnimationPath::Unsupported => {},
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use glam::Vec3;

  use super::*;

  fn sampler(inputs: Vec<f32>, outputs: Vec<Vec4>) -> HalaAnimationSampler {
    HalaAnimationSampler {
      interpolation: HalaInterpolation::Linear,
      inputs,
      outputs,
    }
  }

  fn clip(sampler: HalaAnimationSampler, path: HalaAnimationPath) -> HalaAnimation {
    HalaAnimation::new("clip", vec![sampler], vec![HalaAnimationChannel { path, node: 0, sampler_index: 0 }])
  }

  #[test]
  fn bounds_cover_all_samplers() {
    let animation = HalaAnimation::new(
      "clip",
      vec![
        sampler(vec![0.5, 1.0], vec![Vec4::ZERO; 2]),
        sampler(vec![0.25, 3.0], vec![Vec4::ZERO; 2]),
      ],
      Vec::new(),
    );
    assert_eq!(animation.start, 0.25);
    assert_eq!(animation.end, 3.0);
  }

  #[test]
  fn empty_clip_has_zero_bounds() {
    let animation = HalaAnimation::new("empty", Vec::new(), Vec::new());
    assert_eq!((animation.start, animation.end), (0.0, 0.0));
  }

  #[test]
  fn clock_wraps_once() {
    let mut animation = HalaAnimation::new("clip", vec![sampler(vec![0.0, 2.0], vec![Vec4::ZERO; 2])], Vec::new());
    animation.advance(2.5);
    assert!((animation.current_time - 0.5).abs() < 1e-6);

    // A delta spanning several clip lengths is only wrapped once.
    animation.reset();
    animation.advance(5.0);
    assert!((animation.current_time - 3.0).abs() < 1e-6);
  }

  #[test]
  fn bracket_on_shared_boundary_picks_later_pair() {
    let sampler = sampler(vec![0.0, 1.0, 2.0], vec![Vec4::ZERO; 3]);
    assert_eq!(sampler.bracket(1.0), Some((1, 0.0)));
    assert_eq!(sampler.bracket(0.5), Some((0, 0.5)));
    assert_eq!(sampler.bracket(2.0), Some((1, 1.0)));
    assert_eq!(sampler.bracket(2.5), None);
  }

  #[test]
  fn single_keyframe_never_brackets() {
    let sampler = sampler(vec![0.0], vec![Vec4::ONE]);
    assert_eq!(sampler.bracket(0.0), None);
  }

  #[test]
  fn translation_midpoint_is_lerped() {
    let mut animation = clip(
      sampler(vec![1.0, 3.0], vec![Vec4::new(0.0, 0.0, 0.0, 0.0), Vec4::new(2.0, 4.0, -6.0, 0.0)]),
      HalaAnimationPath::Translation,
    );
    let mut nodes = vec![HalaNode::default()];
    animation.current_time = 2.0;
    animation.apply(&mut nodes);
    assert!(nodes[0].translation.abs_diff_eq(Vec3::new(1.0, 2.0, -3.0), 1e-6));
  }

  #[test]
  fn rotation_is_slerped_to_unit_quaternion() {
    let q1 = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let mut animation = clip(
      sampler(vec![0.0, 1.0], vec![Vec4::from(Quat::IDENTITY), Vec4::from(q1)]),
      HalaAnimationPath::Rotation,
    );
    let mut nodes = vec![HalaNode::default()];
    animation.current_time = 0.5;
    animation.apply(&mut nodes);

    let rotation = nodes[0].rotation;
    assert!((rotation.length() - 1.0).abs() < 1e-5);
    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
    assert!(rotation.abs_diff_eq(expected, 1e-5));
  }

  #[test]
  fn single_keyframe_leaves_node_untouched() {
    let mut animation = clip(sampler(vec![0.0], vec![Vec4::new(5.0, 5.0, 5.0, 0.0)]), HalaAnimationPath::Scale);
    let mut nodes = vec![HalaNode::default()];
    for _ in 0..4 {
      animation.advance(0.3);
      animation.apply(&mut nodes);
    }
    assert_eq!(nodes[0].scale, Vec3::ONE);
  }

  #[test]
  fn non_linear_sampler_is_skipped() {
    let mut step = sampler(vec![0.0, 1.0], vec![Vec4::ZERO, Vec4::ONE]);
    step.interpolation = HalaInterpolation::Step;
    let mut animation = clip(step, HalaAnimationPath::Translation);
    let mut nodes = vec![HalaNode::default()];
    animation.current_time = 0.5;
    animation.apply(&mut nodes);
    assert_eq!(nodes[0].translation, Vec3::ZERO);
  }

  #[test]
  fn short_outputs_are_skipped() {
    let mut animation = clip(sampler(vec![0.0, 1.0], Vec::new()), HalaAnimationPath::Translation);
    let mut nodes = vec![HalaNode::default()];
    animation.current_time = 0.5;
    animation.apply(&mut nodes);
    assert_eq!(nodes[0].translation, Vec3::ZERO);
  }

  #[test]
  fn gltf_tags_are_converted() {
    assert_eq!(HalaInterpolation::from(gltf::animation::Interpolation::CubicSpline), HalaInterpolation::CubicSpline);
    assert_eq!(HalaAnimationPath::from(gltf::animation::Property::Rotation), HalaAnimationPath::Rotation);
    assert_eq!(HalaAnimationPath::from(gltf::animation::Property::MorphTargetWeights), HalaAnimationPath::Unsupported);
  }
}
