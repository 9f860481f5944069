use crate::config::HalaSceneConfig;
use super::scene::HalaScene;

/// The playback state owned by the caller driving the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalaPlayback {
  pub active_animation: u32,
  pub paused: bool,
}

/// The default implementation of the playback.
impl Default for HalaPlayback {
  fn default() -> Self {
    Self {
      active_animation: 0,
      paused: false,
    }
  }
}

impl std::convert::From<&HalaSceneConfig> for HalaPlayback {
  fn from(config: &HalaSceneConfig) -> Self {
    Self {
      active_animation: config.active_animation,
      paused: config.paused,
    }
  }
}

/// The implementation of the playback.
impl HalaPlayback {
  /// Advance the scene by one frame.
  /// Nothing happens while paused, the clip keeps its current time.
  /// param scene: The scene.
  /// param delta_time: The frame time in seconds.
  pub fn advance(&self, scene: &mut HalaScene, delta_time: f32) {
    if self.paused {
      return;
    }
    scene.update_animation(self.active_animation, delta_time);
  }

  /// Switch to another animation, starting it from the beginning.
  /// param scene: The scene.
  /// param active_animation: The animation index.
  pub fn play(&mut self, scene: &mut HalaScene, active_animation: u32) {
    self.active_animation = active_animation;
    self.paused = false;
    if let Some(animation) = scene.animations.get_mut(active_animation as usize) {
      animation.reset();
    }
  }

  pub fn toggle_pause(&mut self) {
    self.paused = !self.paused;
  }
}
