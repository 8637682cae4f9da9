//! Rendering
//!
//! `scene` turns game state into a triangle list in surface pixels; `pipeline`
//! uploads that list to WebGPU. Anything that can show a frame implements
//! [`FrameSink`].

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_frame;
pub use vertex::Vertex;

/// Destination for a finished frame
pub trait FrameSink {
    /// Present one frame of surface-pixel-space triangles
    fn present(&mut self, vertices: &[Vertex], surface_size: (f32, f32));
}
