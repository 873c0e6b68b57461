//! Rendering module
//!
//! The game fills a `DrawList` of primitives in pixel space; `shapes`
//! tessellates it and `pipeline` draws the triangles with WebGPU.

pub mod draw;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw::{Color, DrawCmd, DrawList};
pub use pipeline::RenderState;
pub use scene::draw_scene;
pub use vertex::{Vertex, colors};
