//! Straight edges whose end stops at the target node's boundary instead of its
//! center, leaving room for an arrowhead.

use super::{EdgeGeometry, VertexLayout};
use crate::bezier;
use crate::display::{EdgeDisplayData, NodeDisplayData, node_radius};
use crate::gpu::ShaderDesc;
use crate::vertex::ClampedVertex;

pub const POINTS: usize = 4;
pub const ATTRIBUTES: usize = ClampedVertex::ATTRIBUTES;
pub const STRIDE: usize = POINTS * ATTRIBUTES;

const CLAMPED_SHADER: ShaderDesc = ShaderDesc {
    label: "Clamped Edge Shader",
    source: include_str!("../../data/shaders/edge_clamped.wgsl"),
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClampedEdgeGeometry;

impl EdgeGeometry for ClampedEdgeGeometry {
    const NAME: &'static str = "ClampedEdgeProgram";
    const LAYOUT: VertexLayout = VertexLayout {
        points: POINTS,
        attributes: ATTRIBUTES,
    };

    fn write(
        &self,
        slice: &mut [f32],
        source: &NodeDisplayData,
        target: &NodeDisplayData,
        edge: &EdgeDisplayData,
    ) -> bool {
        let start = source.position();
        let end = target.position();
        let radius = node_radius(target, edge.inverse_sqrt_zoom());
        let normal = bezier::normals(start, end) * edge.thickness();
        let color = edge.color.to_bits();

        let vertices: &mut [ClampedVertex] = bytemuck::cast_slice_mut(slice);
        let corners = [
            (start, normal, 0.0),
            (start, -normal, 0.0),
            (end, normal, radius),
            (end, -normal, radius),
        ];

        for (vertex, (position, normal, radius)) in vertices.iter_mut().zip(corners) {
            *vertex = ClampedVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color,
                radius,
            };
        }

        true
    }

    fn indices(&self, vertex_count: usize) -> Vec<u32> {
        let mut indices = Vec::with_capacity(vertex_count / POINTS * 6);

        for i in (0..vertex_count / POINTS * POINTS).step_by(POINTS) {
            let i = i as u32;
            indices.extend_from_slice(&[i, i + 1, i + 2, i + 2, i + 1, i + 3]);
        }

        indices
    }

    fn shader() -> ShaderDesc {
        CLAMPED_SHADER
    }

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        ClampedVertex::desc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn target_end_carries_the_radius() {
        let source = NodeDisplayData::new(0.0, 0.0, 5.0);
        let target = NodeDisplayData::new(0.0, 80.0, 8.0);
        let edge = EdgeDisplayData {
            size: 2.0,
            color: Color::WHITE,
            ..Default::default()
        };

        let mut slice = vec![0.0; STRIDE];
        assert!(ClampedEdgeGeometry.write(&mut slice, &source, &target, &edge));

        let vertices: &[ClampedVertex] = bytemuck::cast_slice(&slice);
        assert_eq!(vertices[0].radius, 0.0);
        assert_eq!(vertices[3].radius, 8.0);
        assert_eq!(vertices[0].normal, [-2.0, 0.0]);
        assert_eq!(vertices[1].normal, [2.0, 0.0]);
        assert_eq!(vertices[2].position, [0.0, 80.0]);
    }

    #[test]
    fn two_triangles_per_edge() {
        let indices = ClampedEdgeGeometry.indices(8);
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);
    }
}
