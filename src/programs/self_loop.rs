//! Edges whose source and target are the same node, drawn as a cubic loop.

use super::curved::{self, CURVE_POINTS, EDGE_SHADER};
use super::{EdgeGeometry, VertexLayout};
use crate::bezier::Curve;
use crate::display::{Direction, EdgeDisplayData, NodeDisplayData, node_radius};
use crate::gpu::ShaderDesc;
use crate::math::{PI, Point};
use crate::vertex::EdgeVertex;

/// Distance of both control points from the node center, in node radii.
/// Tied to `self_arrow_head::SELF_ARROW_T`: at this reach the loop re-enters
/// the boundary circle at that parameter. Change both together.
pub const SELF_LOOP_REACH: f32 = 4.0;
/// Extra reach for each further set of four loops on the same node.
pub const SELF_LOOP_GROWTH: f32 = 0.5;
const ANGLE_1: f32 = 0.0;
const ANGLE_2: f32 = PI / 2.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SelfLoopGeometry;

fn polar(radius: f32, angle: f32) -> Point {
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// The loop's two control points. Loops take turns on the four quadrants
/// around the node; reverse loops start two quadrants over.
pub fn self_loop_controls(node: &NodeDisplayData, edge: &EdgeDisplayData) -> (Point, Point) {
    let center = node.position();
    let radius = node_radius(node, edge.inverse_sqrt_zoom());

    let shift = match edge.direction {
        Direction::Forward => 0,
        Direction::Backwards => 2,
    };
    let slot = edge.group_position + shift;
    let turn = (slot / 4) as f32;
    let reach = radius * SELF_LOOP_REACH * (1.0 + turn * SELF_LOOP_GROWTH);

    let (mirror_x, mirror_y) = match slot % 4 {
        0 => (1.0, 1.0),
        1 => (-1.0, 1.0),
        2 => (-1.0, -1.0),
        _ => (1.0, -1.0),
    };

    let c1 = polar(reach, ANGLE_1);
    let c2 = polar(reach, ANGLE_2);

    (
        center + Point::new(c1.x * mirror_x, c1.y * mirror_y),
        center + Point::new(c2.x * mirror_x, c2.y * mirror_y),
    )
}

pub fn self_loop_curve(node: &NodeDisplayData, edge: &EdgeDisplayData) -> Curve {
    let (control1, control2) = self_loop_controls(node, edge);
    let center = node.position();

    Curve::Cubic {
        start: center,
        control1,
        control2,
        end: center,
    }
}

impl EdgeGeometry for SelfLoopGeometry {
    const NAME: &'static str = "SelfLoopEdgeProgram";
    const LAYOUT: VertexLayout = VertexLayout {
        points: curved::POINTS,
        attributes: EdgeVertex::ATTRIBUTES,
    };

    fn write(
        &self,
        slice: &mut [f32],
        source: &NodeDisplayData,
        _target: &NodeDisplayData,
        edge: &EdgeDisplayData,
    ) -> bool {
        let points = curved::sample_curve(&self_loop_curve(source, edge));
        curved::write_strip(slice, &points, edge.thickness(), edge.color);
        true
    }

    fn indices(&self, vertex_count: usize) -> Vec<u32> {
        curved::strip_indices(vertex_count, CURVE_POINTS)
    }

    fn shader() -> ShaderDesc {
        EDGE_SHADER
    }

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        EdgeVertex::desc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_is_closed_at_the_node_center() {
        let node = NodeDisplayData::new(40.0, -12.0, 10.0);
        let curve = self_loop_curve(&node, &EdgeDisplayData::default());

        let start = curve.point_at(0.0);
        let end = curve.point_at(1.0);
        assert!(start.distance(node.position()) < 1e-4);
        assert!(end.distance(node.position()) < 1e-4);
        assert!(curve.point_at(0.5).distance(node.position()) > 10.0);
    }

    #[test]
    fn controls_are_a_quarter_turn_apart() {
        let node = NodeDisplayData::new(0.0, 0.0, 10.0);
        let (c1, c2) = self_loop_controls(&node, &EdgeDisplayData::default());

        assert!((c1.length() - 40.0).abs() < 1e-3);
        assert!((c2.length() - 40.0).abs() < 1e-3);
        assert!((c1.x * c2.x + c1.y * c2.y).abs() < 1e-2);
    }

    #[test]
    fn loops_on_one_node_take_different_quadrants() {
        let node = NodeDisplayData::new(0.0, 0.0, 10.0);
        let peaks: Vec<Point> = (0..4)
            .map(|k| {
                let edge = EdgeDisplayData {
                    group_size: 4,
                    group_position: k,
                    ..Default::default()
                };
                self_loop_curve(&node, &edge).point_at(0.5)
            })
            .collect();

        for i in 0..peaks.len() {
            for j in i + 1..peaks.len() {
                assert!(peaks[i].distance(peaks[j]) > 5.0);
            }
        }
    }

    #[test]
    fn reverse_loop_bulges_the_other_way() {
        let node = NodeDisplayData::new(0.0, 0.0, 10.0);
        let forward = self_loop_curve(&node, &EdgeDisplayData::default()).point_at(0.5);
        let backward = self_loop_curve(
            &node,
            &EdgeDisplayData {
                direction: Direction::Backwards,
                ..Default::default()
            },
        )
        .point_at(0.5);

        assert!(forward.x > 0.0 && forward.y > 0.0);
        assert!(backward.x < 0.0 && backward.y < 0.0);
    }

    #[test]
    fn fills_a_whole_stride() {
        let node = NodeDisplayData::new(5.0, 5.0, 3.0);
        let mut slice = vec![f32::NAN; curved::STRIDE];

        assert!(SelfLoopGeometry.write(&mut slice, &node, &node, &EdgeDisplayData::default()));
        let vertices: &[EdgeVertex] = bytemuck::cast_slice(&slice);
        assert!(vertices.iter().all(|v| v.position[0].is_finite() && v.normal[1].is_finite()));
    }
}
