//! Per-frame display records handed to the edge programs by the host.

use crate::color::Color;
use crate::math::Point;

/// Radius multiplier applied to highlighted nodes, which draw a halo ring.
pub const HIGHLIGHT_RADIUS_SCALE: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backwards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeKind {
    Straight,
    #[default]
    Curved,
    SelfLoop,
}

/// Level of detail for geometry that has a cheap and an accurate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    Fast,
    #[default]
    Fine,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeDisplayData {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub highlighted: bool,
    /// Radius already expressed in graph coordinates, when the host knows it.
    pub framed_radius: Option<f32>,
}

impl NodeDisplayData {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            size,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDisplayData {
    /// Thickness.
    pub size: f32,
    pub color: Color,
    pub label: Option<String>,
    pub group_size: usize,
    pub group_position: usize,
    pub direction: Direction,
    /// Explicit control point, overriding the one derived from the group.
    pub control: Option<Point>,
    pub inverse_sqrt_zoom_ratio: f32,
    pub selected: bool,
    pub kind: EdgeKind,
}

impl Default for EdgeDisplayData {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: Color::BLACK,
            label: None,
            group_size: 1,
            group_position: 0,
            direction: Direction::Forward,
            control: None,
            inverse_sqrt_zoom_ratio: 1.0,
            selected: false,
            kind: EdgeKind::Curved,
        }
    }
}

impl EdgeDisplayData {
    /// Thickness, with non-positive or missing values read as 1.
    pub fn thickness(&self) -> f32 {
        if self.size > 0.0 && self.size.is_finite() {
            self.size
        } else {
            1.0
        }
    }

    pub fn inverse_sqrt_zoom(&self) -> f32 {
        if self.inverse_sqrt_zoom_ratio > 0.0 && self.inverse_sqrt_zoom_ratio.is_finite() {
            self.inverse_sqrt_zoom_ratio
        } else {
            1.0
        }
    }
}

/// Radius of a node's boundary circle in the coordinate space of its position.
pub fn node_radius(node: &NodeDisplayData, inverse_sqrt_zoom_ratio: f32) -> f32 {
    if let Some(radius) = node.framed_radius {
        return radius;
    }

    let radius = node.size * inverse_sqrt_zoom_ratio;
    if node.highlighted {
        radius * HIGHLIGHT_RADIUS_SCALE
    } else {
        radius
    }
}
