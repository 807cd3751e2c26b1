//! Vertex records as they sit in the flat `f32` buffers, and their wgpu layouts.
//!
//! Each struct is exactly `ATTRIBUTES` floats wide so a program's buffer slice
//! can be reinterpreted with `bytemuck` and written field by field.

use std::mem;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EdgeVertex {
    pub position: [f32; 2],
    pub normal: [f32; 2],
    pub color: u32,
    /// 1 for vertices of the line body, 0 for anything else sharing the shader.
    pub body: f32,
}

impl EdgeVertex {
    pub const ATTRIBUTES: usize = mem::size_of::<EdgeVertex>() / mem::size_of::<f32>();

    const ATTRIBS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Unorm8x4, 3 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<EdgeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ClampedVertex {
    pub position: [f32; 2],
    pub normal: [f32; 2],
    pub color: u32,
    /// Distance to pull the vertex back from the target along the edge.
    pub radius: f32,
}

impl ClampedVertex {
    pub const ATTRIBUTES: usize = mem::size_of::<ClampedVertex>() / mem::size_of::<f32>();

    const ATTRIBS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Unorm8x4, 3 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ClampedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ArrowVertex {
    pub position: [f32; 2],
    pub normal: [f32; 2],
    pub radius: f32,
    pub color: u32,
    pub barycentric: [f32; 3],
}

impl ArrowVertex {
    pub const ATTRIBUTES: usize = mem::size_of::<ArrowVertex>() / mem::size_of::<f32>();

    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32,
        3 => Unorm8x4,
        4 => Float32x3
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ArrowVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub const BARYCENTRIC_CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_counts_match_float_slots() {
        assert_eq!(EdgeVertex::ATTRIBUTES, 6);
        assert_eq!(ClampedVertex::ATTRIBUTES, 6);
        assert_eq!(ArrowVertex::ATTRIBUTES, 9);
    }

    #[test]
    fn color_offset_matches_layout() {
        let layout = ArrowVertex::desc();
        assert_eq!(layout.attributes[3].offset, 20);
        assert_eq!(layout.array_stride, 36);

        let layout = EdgeVertex::desc();
        assert_eq!(layout.attributes[2].offset, 16);
        assert_eq!(layout.attributes[3].offset, 20);
    }
}
