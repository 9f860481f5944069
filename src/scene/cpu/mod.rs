pub mod node;
pub mod material;
pub mod image_data;
pub mod mesh;
pub mod animation;
pub mod playback;
pub mod scene;

pub use scene::HalaScene;
