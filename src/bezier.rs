//! Bezier and vector helpers shared by the edge programs and the label drawer.
//!
//! Everything here is pure and works in whatever coordinate space the caller
//! hands in. Degenerate input (coincident points) yields zero vectors rather
//! than `NaN`, so the results can go straight into a vertex buffer.

use crate::display::Direction;
use crate::math::Point;

/// Curve height step between neighbouring parallel edges, relative to the
/// distance between the two endpoints.
pub const CURVE_HEIGHT_STEP: f32 = 0.15;
/// Bisection steps in `refine_crossing`.
const CROSSING_ITERATIONS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl Curve {
    pub fn point_at(&self, t: f32) -> Point {
        match *self {
            Curve::Quadratic {
                start,
                control,
                end,
            } => point_on_quadratic(start, control, end, t),
            Curve::Cubic {
                start,
                control1,
                control2,
                end,
            } => point_on_cubic(start, control1, control2, end, t),
        }
    }

    pub fn start(&self) -> Point {
        match *self {
            Curve::Quadratic { start, .. } | Curve::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Curve::Quadratic { end, .. } | Curve::Cubic { end, .. } => end,
        }
    }
}

/// One lookup-table sample: a point on the curve and the parameter it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutSample {
    pub x: f32,
    pub y: f32,
    pub t: f32,
}

impl LutSample {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub fn point_on_quadratic(p0: Point, control: Point, p2: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let a = u * u;
    let b = 2.0 * u * t;
    let c = t * t;

    Point::new(
        a * p0.x + b * control.x + c * p2.x,
        a * p0.y + b * control.y + c * p2.y,
    )
}

pub fn point_on_cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;

    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

pub fn line_length(a: Point, b: Point) -> f32 {
    a.distance(b)
}

/// Unit vector perpendicular to `a -> b`. A zero-length segment gives the
/// zero vector.
pub fn normals(a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();

    if len == 0.0 || !len.is_finite() {
        return Point::ZERO;
    }

    Point::new(-dy / len, dx / len)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Control point of a quadratic curve bowing `height` away from the chord.
/// `height` is relative to the chord length, so the shape is scale-free.
pub fn control_at_height(height: f32, start: Point, end: Point) -> Point {
    let mid = midpoint(start, end);
    let normal = normals(start, end);
    let offset = height * line_length(start, end);

    mid + normal * offset
}

/// Signed curve height for edge `group_position` of `group_size` parallel
/// edges. A lone edge is straight. Otherwise slots are paired, `2j` above and
/// `2j + 1` below the chord at `CURVE_HEIGHT_STEP * (j + 1)`, so no two edges
/// of a group share a height. Even groups are symmetric about the chord; in
/// an odd group the last slot has no mirror and the group leans positive.
pub fn curve_height(group_size: usize, group_position: usize, direction: Direction) -> f32 {
    if group_size <= 1 {
        return 0.0;
    }

    let rank = (group_position / 2 + 1) as f32;
    let side = if group_position % 2 == 0 { 1.0 } else { -1.0 };
    let height = side * rank * CURVE_HEIGHT_STEP;

    match direction {
        Direction::Forward => height,
        Direction::Backwards => -height,
    }
}

/// Samples `curve` at `resolution` evenly spaced parameters, both ends included.
pub fn build_lut(curve: &Curve, resolution: usize) -> Vec<LutSample> {
    match resolution {
        0 => Vec::new(),
        1 => {
            let p = curve.point_at(0.0);
            vec![LutSample {
                x: p.x,
                y: p.y,
                t: 0.0,
            }]
        }
        _ => {
            let last = (resolution - 1) as f32;
            (0..resolution)
                .map(|i| {
                    let t = i as f32 / last;
                    let p = curve.point_at(t);
                    LutSample { x: p.x, y: p.y, t }
                })
                .collect()
        }
    }
}

/// Indices of the LUT samples lying strictly inside the circle.
pub fn curve_circle_intersection(lut: &[LutSample], center: Point, radius: f32) -> Vec<usize> {
    lut.iter()
        .enumerate()
        .filter(|(_, sample)| sample.point().distance(center) < radius)
        .map(|(i, _)| i)
        .collect()
}

/// Narrows a circle crossing bracketed by `outside_t` and `inside_t` down to
/// the boundary. Returns a parameter whose point is still inside the circle.
pub fn refine_crossing(curve: &Curve, center: Point, radius: f32, outside_t: f32, inside_t: f32) -> f32 {
    let (mut outside_t, mut inside_t) = (outside_t, inside_t);

    for _ in 0..CROSSING_ITERATIONS {
        let t = (outside_t + inside_t) * 0.5;
        if curve.point_at(t).distance(center) < radius {
            inside_t = t;
        } else {
            outside_t = t;
        }
    }

    inside_t
}
