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

/// Textured vertex; `color` tints the sampled texel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TexVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl TexVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Same color with a new alpha
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Blend toward white (`t > 0`) or black (`t < 0`)
pub fn shade(color: [f32; 4], t: f32) -> [f32; 4] {
    let target = if t >= 0.0 { 1.0 } else { 0.0 };
    let t = t.abs().min(1.0);
    [
        color[0] + (target - color[0]) * t,
        color[1] + (target - color[1]) * t,
        color[2] + (target - color[2]) * t,
        color[3],
    ]
}

/// Subtract `amount` (0-255 scale) from each channel, saturating at black
pub fn darken(color: [f32; 4], amount: u8) -> [f32; 4] {
    let d = f32::from(amount) / 255.0;
    [
        (color[0] - d).max(0.0),
        (color[1] - d).max(0.0),
        (color[2] - d).max(0.0),
        color[3],
    ]
}

/// Palette
pub mod colors {
    use super::rgb;

    pub const WHITE: [f32; 4] = rgb(255, 255, 255);
    pub const BLACK: [f32; 4] = rgb(0, 0, 0);
    pub const LIGHT_GRAY: [f32; 4] = rgb(200, 200, 200);

    // Soft toddler palette
    pub const RED: [f32; 4] = rgb(255, 89, 94);
    pub const YELLOW: [f32; 4] = rgb(255, 202, 58);
    pub const GREEN: [f32; 4] = rgb(138, 201, 38);
    pub const BLUE: [f32; 4] = rgb(25, 130, 196);
    pub const PURPLE: [f32; 4] = rgb(106, 76, 147);
    pub const ORANGE: [f32; 4] = rgb(255, 146, 76);
    pub const PINK: [f32; 4] = rgb(255, 119, 168);
    pub const SKY: [f32; 4] = rgb(100, 200, 255);

    /// Cycle order for launcher tiles and balloons
    pub const PALETTE: [[f32; 4]; 7] = [RED, YELLOW, GREEN, BLUE, PURPLE, ORANGE, PINK];

    pub const BACKGROUND_LIGHT: [f32; 4] = rgb(240, 248, 255);
    pub const BACKGROUND_CREAM: [f32; 4] = rgb(255, 253, 245);

    pub const BACK_BUTTON: [f32; 4] = rgb(100, 100, 100);
    pub const BACK_BUTTON_HOVER: [f32; 4] = rgb(70, 70, 70);
}
