//! Curved edges between two distinct nodes, drawn as a thick quadratic
//! Bezier strip.

use super::{EdgeGeometry, VertexLayout};
use crate::bezier::{self, Curve};
use crate::color::Color;
use crate::display::{EdgeDisplayData, NodeDisplayData};
use crate::gpu::ShaderDesc;
use crate::math::Point;
use crate::vertex::EdgeVertex;

pub const RESOLUTION: f32 = 0.02;
/// Line segments per curve, `1 / RESOLUTION`.
pub const SEGMENTS: usize = 50;
/// Sampled points per curve.
pub const CURVE_POINTS: usize = SEGMENTS + 1;
/// Vertices per curve, `2 / RESOLUTION + 2`.
pub const POINTS: usize = 2 * CURVE_POINTS;
pub const ATTRIBUTES: usize = EdgeVertex::ATTRIBUTES;
pub const STRIDE: usize = POINTS * ATTRIBUTES;

pub(crate) const EDGE_SHADER: ShaderDesc = ShaderDesc {
    label: "Curved Edge Shader",
    source: include_str!("../../data/shaders/edge_curved.wgsl"),
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CurvedEdgeGeometry;

/// Control point of the edge's quadratic curve: the explicit one when set,
/// otherwise the one its group slot calls for.
pub fn edge_control(start: Point, end: Point, edge: &EdgeDisplayData) -> Point {
    edge.control.unwrap_or_else(|| {
        let height = bezier::curve_height(edge.group_size, edge.group_position, edge.direction);
        bezier::control_at_height(height, start, end)
    })
}

pub fn edge_curve(source: &NodeDisplayData, target: &NodeDisplayData, edge: &EdgeDisplayData) -> Curve {
    let start = source.position();
    let end = target.position();

    Curve::Quadratic {
        start,
        control: edge_control(start, end, edge),
        end,
    }
}

pub fn sample_curve(curve: &Curve) -> Vec<Point> {
    (0..CURVE_POINTS)
        .map(|j| curve.point_at(j as f32 / SEGMENTS as f32))
        .collect()
}

/// Emits two vertices per point, offset by `+normal * thickness` and
/// `-normal * thickness`. End points use their only segment's normal, inner
/// points the average of both neighbours instead of a true miter.
pub fn write_strip(slice: &mut [f32], points: &[Point], thickness: f32, color: Color) {
    let vertices: &mut [EdgeVertex] = bytemuck::cast_slice_mut(slice);
    debug_assert_eq!(vertices.len(), points.len() * 2);

    let color = color.to_bits();
    let last = points.len().saturating_sub(1);

    for (j, point) in points.iter().enumerate() {
        let normal = if points.len() < 2 {
            Point::ZERO
        } else if j == 0 {
            bezier::normals(points[0], points[1])
        } else if j == last {
            bezier::normals(points[j - 1], points[j])
        } else {
            let first = bezier::normals(points[j - 1], points[j]);
            let second = bezier::normals(points[j], points[j + 1]);
            bezier::midpoint(first, second)
        };

        let offset = normal * thickness;

        vertices[2 * j] = EdgeVertex {
            position: point.to_array(),
            normal: offset.to_array(),
            color,
            body: 1.0,
        };
        vertices[2 * j + 1] = EdgeVertex {
            position: point.to_array(),
            normal: (-offset).to_array(),
            color,
            body: 1.0,
        };
    }
}

/// Two triangles per quad of four consecutive vertices, walking two vertices
/// at a time. The quad starting at a curve's last point would reach into the
/// next curve and is skipped.
pub fn strip_indices(vertex_count: usize, points_per_curve: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(vertex_count * 3);

    for i in (0..vertex_count.saturating_sub(3)).step_by(2) {
        if (i / 2) % points_per_curve == points_per_curve - 1 {
            continue;
        }

        let i = i as u32;
        indices.extend_from_slice(&[i, i + 1, i + 2, i + 2, i + 1, i + 3]);
    }

    indices
}

impl EdgeGeometry for CurvedEdgeGeometry {
    const NAME: &'static str = "CurvedEdgeProgram";
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
        let points = sample_curve(&edge_curve(source, target, edge));
        write_strip(slice, &points, edge.thickness(), edge.color);
        true
    }

    fn indices(&self, vertex_count: usize) -> Vec<u32> {
        strip_indices(vertex_count, CURVE_POINTS)
    }

    fn shader() -> ShaderDesc {
        EDGE_SHADER
    }

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        EdgeVertex::desc()
    }
}
