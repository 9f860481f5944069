pub mod loader;
pub mod vertex;
pub mod cpu;

pub use vertex::HalaVertex;
