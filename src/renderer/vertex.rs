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
    use crate::consts::PALETTE_LEN;

    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND_HIGH_CONTRAST: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PIPE: [f32; 4] = [0.0, 0.89, 0.19, 1.0];
    pub const CLOUD: [f32; 4] = [0.85, 0.9, 0.97, 1.0];
    pub const CLOUD_HIGH_CONTRAST: [f32; 4] = [0.25, 0.25, 0.32, 1.0];

    /// Bird colors, cycled by the color key
    pub const BIRD_PALETTE: [[f32; 4]; PALETTE_LEN] = [
        [0.9, 0.16, 0.22, 1.0],  // Red
        [1.0, 0.63, 0.0, 1.0],   // Orange
        [0.99, 0.98, 0.0, 1.0],  // Yellow
        [0.0, 0.47, 0.95, 1.0],  // Blue
        [0.78, 0.48, 1.0, 1.0],  // Purple
    ];
}
