//! Arrowheads for curved edges: one triangle at the target node's boundary.

use super::curved::edge_curve;
use super::{EdgeGeometry, VertexLayout};
use crate::bezier::{self, Curve};
use crate::color::Color;
use crate::display::{EdgeDisplayData, NodeDisplayData, RenderQuality, node_radius};
use crate::gpu::ShaderDesc;
use crate::math::Point;
use crate::vertex::{ArrowVertex, BARYCENTRIC_CORNERS};

pub const POINTS: usize = 3;
pub const ATTRIBUTES: usize = ArrowVertex::ATTRIBUTES;
pub const STRIDE: usize = POINTS * ATTRIBUTES;

/// Samples used when searching for the curve/boundary crossing.
pub const LUT_RESOLUTION: usize = 50;

const ADJUSTMENT_BASE: f32 = 0.007;
const ADJUSTMENT_DISTANCE_THRESHOLD: f32 = 0.1;
const ADJUSTMENT_SCALE: f32 = 0.15;

pub(crate) const ARROW_SHADER: ShaderDesc = ShaderDesc {
    label: "Arrow Head Shader",
    source: include_str!("../../data/shaders/arrow_head.wgsl"),
};

/// Where and how an arrowhead sits. The shader pulls the tip back from
/// `position` by `radius` along the tangent derived from `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub position: Point,
    /// Curve normal at the tip, scaled by the edge thickness.
    pub normal: Point,
    pub radius: f32,
}

impl ArrowHead {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.normal.is_finite() && self.radius.is_finite()
    }
}

pub fn write_arrow(slice: &mut [f32], head: &ArrowHead, color: Color) {
    let vertices: &mut [ArrowVertex] = bytemuck::cast_slice_mut(slice);
    let color = color.to_bits();

    for (vertex, barycentric) in vertices.iter_mut().zip(BARYCENTRIC_CORNERS) {
        *vertex = ArrowVertex {
            position: head.position.to_array(),
            normal: head.normal.to_array(),
            radius: head.radius,
            color,
            barycentric,
        };
    }
}

/// Pulls the control point toward the chord so the head lines up with the
/// drawn curve; short edges need a larger correction.
pub fn calculate_adjustment_factor(distance_between_nodes: f32) -> f32 {
    if distance_between_nodes >= ADJUSTMENT_DISTANCE_THRESHOLD {
        return ADJUSTMENT_BASE;
    }

    ADJUSTMENT_BASE + (ADJUSTMENT_DISTANCE_THRESHOLD - distance_between_nodes) * ADJUSTMENT_SCALE
}

/// Constant-time approximation: the head sits on the target center and the
/// shader clamps it to the boundary. Orientation comes from an adjusted
/// control point instead of a search along the curve.
pub fn arrow_head_fast(
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
) -> Option<ArrowHead> {
    let start = source.position();
    let end = target.position();
    let radius = node_radius(target, edge.inverse_sqrt_zoom());

    let control = match edge.control {
        Some(control) => control,
        None => {
            let height = bezier::curve_height(edge.group_size, edge.group_position, edge.direction);
            let mut adjusted = 0.0;

            if height != 0.0 {
                let distance = bezier::line_length(start, end);
                adjusted = height.abs() - calculate_adjustment_factor(distance);
            }
            if height < 0.0 {
                adjusted = -adjusted;
            }

            bezier::control_at_height(adjusted, start, end)
        }
    };

    let normal = bezier::normals(control, end);

    Some(ArrowHead {
        position: end,
        normal: normal * edge.thickness(),
        radius,
    })
}

/// Finds where the curve crosses into the target circle using a LUT, then
/// bisects between the bracketing samples so the tip sits on the boundary
/// even when the samples are further apart than the radius. When
/// the target circle is never entered, the crossing out of the source circle
/// is mirrored onto the forward parametrization.
pub fn arrow_head_fine(
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
) -> Option<ArrowHead> {
    let curve = edge_curve(source, target, edge);
    let lut = bezier::build_lut(&curve, LUT_RESOLUTION);
    let inverse_sqrt_zoom = edge.inverse_sqrt_zoom();

    let target_radius = node_radius(target, inverse_sqrt_zoom);
    let hits = bezier::curve_circle_intersection(&lut, curve.end(), target_radius);

    let t = match hits.first() {
        Some(&0) => lut[0].t,
        Some(&i) => bezier::refine_crossing(&curve, curve.end(), target_radius, lut[i - 1].t, lut[i].t),
        None => {
            let source_radius = node_radius(source, inverse_sqrt_zoom);
            let hits = bezier::curve_circle_intersection(&lut, curve.start(), source_radius);
            let i = *hits.last()?;
            let exit = match lut.get(i + 1) {
                Some(outside) => {
                    bezier::refine_crossing(&curve, curve.start(), source_radius, outside.t, lut[i].t)
                }
                None => lut[i].t,
            };
            1.0 - exit
        }
    };

    let tip = curve.point_at(t);
    let normal = tangent_normal(&curve, t);

    let head = ArrowHead {
        position: tip,
        normal: normal * edge.thickness(),
        radius: 0.0,
    };

    head.is_finite().then_some(head)
}

/// Normal at `t`, from the sampled segment that ends there.
pub(crate) fn tangent_normal(curve: &Curve, t: f32) -> Point {
    let step = 1.0 / (LUT_RESOLUTION - 1) as f32;
    let tip = curve.point_at(t);

    if t > 0.0 {
        bezier::normals(curve.point_at((t - step).max(0.0)), tip)
    } else {
        bezier::normals(tip, curve.point_at(step))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowHeadGeometry {
    pub quality: RenderQuality,
}

impl ArrowHeadGeometry {
    pub fn new(quality: RenderQuality) -> Self {
        Self { quality }
    }
}

impl EdgeGeometry for ArrowHeadGeometry {
    const NAME: &'static str = "ArrowHeadProgram";
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
        let head = match self.quality {
            RenderQuality::Fast => arrow_head_fast(source, target, edge),
            RenderQuality::Fine => arrow_head_fine(source, target, edge),
        };

        match head {
            Some(head) => {
                write_arrow(slice, &head, edge.color);
                true
            }
            None => {
                log::warn!(
                    "{}: no boundary crossing between ({}, {}) and ({}, {}), skipping arrow",
                    Self::NAME,
                    source.x,
                    source.y,
                    target.x,
                    target.y
                );
                false
            }
        }
    }

    fn set_quality(&mut self, quality: RenderQuality) {
        self.quality = quality;
    }

    fn shader() -> ShaderDesc {
        ARROW_SHADER
    }

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        ArrowVertex::desc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::{ProgramBuffers, process};

    fn nodes() -> (NodeDisplayData, NodeDisplayData) {
        (
            NodeDisplayData::new(0.0, 0.0, 10.0),
            NodeDisplayData::new(100.0, 0.0, 10.0),
        )
    }

    #[test]
    fn adjustment_factor_is_flat_above_threshold() {
        assert_eq!(calculate_adjustment_factor(0.1), 0.007);
        assert_eq!(calculate_adjustment_factor(25.0), 0.007);
        assert!((calculate_adjustment_factor(0.0) - (0.007 + 0.1 * 0.15)).abs() < 1e-6);
        assert!(calculate_adjustment_factor(0.02) > calculate_adjustment_factor(0.05));
    }

    #[test]
    fn fine_tip_lands_on_target_boundary() {
        let (source, target) = nodes();
        let edge = EdgeDisplayData {
            group_size: 2,
            ..Default::default()
        };

        let head = arrow_head_fine(&source, &target, &edge).unwrap();
        let distance = head.position.distance(target.position());
        let spacing = 130.0 / LUT_RESOLUTION as f32;

        assert!(distance < 10.0);
        assert!(distance > 10.0 - spacing);
        assert!((head.normal.length() - 1.0).abs() < 1e-3);
        assert_eq!(head.radius, 0.0);
    }

    #[test]
    fn fine_tip_reaches_boundary_of_small_node_on_long_edge() {
        let source = NodeDisplayData::new(0.0, 0.0, 10.0);
        let target = NodeDisplayData::new(1000.0, 0.0, 10.0);

        let head = arrow_head_fine(&source, &target, &EdgeDisplayData::default()).unwrap();
        let distance = head.position.distance(target.position());

        assert!((distance - 10.0).abs() < 0.01, "tip {distance} from the center");
        assert!(head.normal.x.abs() < 1e-4);
    }

    #[test]
    fn fine_falls_back_to_source_circle() {
        let (source, mut target) = nodes();
        target.framed_radius = Some(0.0);

        let head = arrow_head_fine(&source, &target, &EdgeDisplayData::default()).unwrap();

        assert!(head.is_finite());
        assert!((head.position.x - 90.0).abs() < 3.0);
    }

    #[test]
    fn unresolvable_arrow_writes_nothing() {
        let (mut source, mut target) = nodes();
        source.framed_radius = Some(0.0);
        target.framed_radius = Some(0.0);

        assert!(arrow_head_fine(&source, &target, &EdgeDisplayData::default()).is_none());

        let geometry = ArrowHeadGeometry::new(RenderQuality::Fine);
        let mut buffers = ProgramBuffers::new(ArrowHeadGeometry::LAYOUT);
        buffers.allocate(1);
        buffers.vertex_array.fill(3.0);

        process(&geometry, &mut buffers, &source, &target, &EdgeDisplayData::default(), false, 0);
        assert!(buffers.vertex_array.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn fast_head_sits_on_target_center() {
        let (source, target) = nodes();
        let edge = EdgeDisplayData {
            size: 3.0,
            group_size: 3,
            group_position: 2,
            ..Default::default()
        };

        let head = arrow_head_fast(&source, &target, &edge).unwrap();
        assert_eq!(head.position, target.position());
        assert_eq!(head.radius, 10.0);
        assert!((head.normal.length() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn fast_and_fine_agree_on_a_straight_edge() {
        let (source, target) = nodes();
        let edge = EdgeDisplayData::default();

        let fast = arrow_head_fast(&source, &target, &edge).unwrap();
        let fine = arrow_head_fine(&source, &target, &edge).unwrap();

        assert!((fast.normal.x - fine.normal.x).abs() < 1e-3);
        assert!((fast.normal.y - fine.normal.y).abs() < 1e-3);
    }

    #[test]
    fn vertices_carry_one_hot_corners() {
        let (source, target) = nodes();
        let mut slice = vec![0.0; STRIDE];
        let geometry = ArrowHeadGeometry::default();

        assert!(geometry.write(&mut slice, &source, &target, &EdgeDisplayData::default()));

        let vertices: &[ArrowVertex] = bytemuck::cast_slice(&slice);
        assert_eq!(vertices[0].barycentric, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].barycentric, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].barycentric, [0.0, 0.0, 1.0]);
        assert!(vertices.iter().all(|v| v.position == vertices[0].position));
    }
}
