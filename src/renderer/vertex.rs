//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const SHIP_GLOW: [f32; 4] = [0.0, 1.0, 1.0, 0.25];
    pub const BULLET: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const ASTEROID: [f32; 4] = [1.0, 0.333, 0.333, 1.0];
    pub const ASTEROID_GLOW: [f32; 4] = [1.0, 0.0, 0.0, 0.25];
    pub const PARTICLE: [f32; 4] = [1.0, 0.667, 0.667, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// Same color with alpha scaled by `factor`
    pub fn faded(color: [f32; 4], factor: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * factor.clamp(0.0, 1.0)]
    }
}
