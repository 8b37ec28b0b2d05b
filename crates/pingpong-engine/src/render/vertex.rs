use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec4};

/// Byte size of one [`Vertex`]; the stride recorded for every vertex buffer.
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

/// Mesh vertex: clip-space position followed by an RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    /// POSITION at location 0 (offset 0), COLOR at location 1 (offset 16).
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

    pub const fn new(position: Vec4, color: ColorRgba) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
