//! Arrowheads for self-loops.

use super::arrow_head::{ARROW_SHADER, ArrowHead, POINTS, tangent_normal, write_arrow};
use super::self_loop::self_loop_curve;
use super::{EdgeGeometry, VertexLayout};
use crate::display::{EdgeDisplayData, NodeDisplayData};
use crate::gpu::ShaderDesc;
use crate::vertex::ArrowVertex;

/// Parameter at which the loop re-enters its node's boundary circle. Only
/// holds for `self_loop::SELF_LOOP_REACH` control points;
/// `tip_sits_on_the_node_boundary` pins the pair together.
pub const SELF_ARROW_T: f32 = 0.8975;

#[derive(Debug, Clone, Copy, Default)]
pub struct SelfArrowHeadGeometry;

pub fn self_arrow_head(node: &NodeDisplayData, edge: &EdgeDisplayData) -> ArrowHead {
    let curve = self_loop_curve(node, edge);

    ArrowHead {
        position: curve.point_at(SELF_ARROW_T),
        normal: tangent_normal(&curve, SELF_ARROW_T) * edge.thickness(),
        radius: 0.0,
    }
}

impl EdgeGeometry for SelfArrowHeadGeometry {
    const NAME: &'static str = "SelfArrowHeadProgram";
    const LAYOUT: VertexLayout = VertexLayout {
        points: POINTS,
        attributes: ArrowVertex::ATTRIBUTES,
    };

    fn write(
        &self,
        slice: &mut [f32],
        source: &NodeDisplayData,
        _target: &NodeDisplayData,
        edge: &EdgeDisplayData,
    ) -> bool {
        let head = self_arrow_head(source, edge);
        write_arrow(slice, &head, edge.color);
        true
    }

    fn shader() -> ShaderDesc {
        ARROW_SHADER
    }

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        ArrowVertex::desc()
    }
}
