//! WebGPU rendering module
//!
//! Objects are tessellated on the CPU (`scene`) and drawn as one flat-shaded
//! triangle list.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{background, build_scene};
pub use vertex::Vertex;
