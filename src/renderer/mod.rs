//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as a flat triangle list in screen pixels
//! and drawn with a single pass-through pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;

use thiserror::Error;

/// Failures while setting up the GPU side
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
