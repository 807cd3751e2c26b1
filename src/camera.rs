use crate::display::{NodeDisplayData, node_radius};
use crate::gpu::RenderParams;
use crate::math::{Mat3, Point, clamp};

pub const MIN_RATIO: f32 = 0.05;
pub const MAX_RATIO: f32 = 20.0;

/// Pan and zoom over graph space. At ratio 1 one graph unit spans the
/// viewport's shorter side; larger ratios are zoomed out. Graph y grows
/// downwards like the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            ratio: 1.0,
        }
    }
}

impl Camera {
    pub fn new(x: f32, y: f32, ratio: f32) -> Self {
        Self {
            x,
            y,
            ratio: clamp(ratio, MIN_RATIO, MAX_RATIO),
        }
    }

    /// Graph units per pixel at ratio 1.
    pub fn correction_ratio(viewport: (f32, f32)) -> f32 {
        let min = viewport.0.min(viewport.1);
        if min > 0.0 { 1.0 / min } else { 1.0 }
    }

    pub fn inverse_sqrt_zoom_ratio(&self) -> f32 {
        1.0 / self.ratio.sqrt()
    }

    /// Graph space to clip space.
    pub fn matrix(&self, viewport: (f32, f32)) -> Mat3 {
        let (width, height) = viewport;
        if width <= 0.0 || height <= 0.0 {
            return Mat3::identity();
        }

        let min = width.min(height);
        let scale = Mat3::from_scale(
            2.0 * min / (width * self.ratio),
            -2.0 * min / (height * self.ratio),
        );

        scale * Mat3::from_translation(-self.x, -self.y)
    }

    pub fn render_params(&self, viewport: (f32, f32)) -> RenderParams {
        RenderParams {
            matrix: self.matrix(viewport),
            ratio: self.ratio,
            correction_ratio: Self::correction_ratio(viewport),
        }
    }

    pub fn graph_to_viewport(&self, point: Point, viewport: (f32, f32)) -> Point {
        let clip = self.matrix(viewport).transform_point(point);
        Point::new(
            (clip.x + 1.0) * 0.5 * viewport.0,
            (1.0 - clip.y) * 0.5 * viewport.1,
        )
    }

    pub fn viewport_to_graph(&self, point: Point, viewport: (f32, f32)) -> Point {
        let units = self.ratio * Self::correction_ratio(viewport);
        Point::new(
            self.x + (point.x - viewport.0 * 0.5) * units,
            self.y + (point.y - viewport.1 * 0.5) * units,
        )
    }

    /// Moves the view by a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Point, viewport: (f32, f32)) {
        let units = self.ratio * Self::correction_ratio(viewport);
        self.x -= delta.x * units;
        self.y -= delta.y * units;
    }

    /// Multiplies the ratio by `factor`, keeping the graph point under
    /// `anchor` (in pixels) in place.
    pub fn zoom(&mut self, factor: f32, anchor: Point, viewport: (f32, f32)) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }

        let before = self.viewport_to_graph(anchor, viewport);
        self.ratio = clamp(self.ratio * factor, MIN_RATIO, MAX_RATIO);
        let after = self.viewport_to_graph(anchor, viewport);

        self.x += before.x - after.x;
        self.y += before.y - after.y;
    }

    /// A node as the GPU programs see it: graph position, radius converted
    /// from pixels to graph units.
    pub fn frame_node(&self, node: &NodeDisplayData, viewport: (f32, f32)) -> NodeDisplayData {
        let pixels = node_radius(node, self.inverse_sqrt_zoom_ratio());
        NodeDisplayData {
            framed_radius: Some(pixels * self.ratio * Self::correction_ratio(viewport)),
            ..*node
        }
    }

    /// A node as the label drawer sees it: pixel position, pixel size.
    pub fn viewport_node(&self, node: &NodeDisplayData, viewport: (f32, f32)) -> NodeDisplayData {
        let position = self.graph_to_viewport(node.position(), viewport);
        NodeDisplayData {
            x: position.x,
            y: position.y,
            framed_radius: None,
            ..*node
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-3, "{a:?} vs {b:?}");
    }

    #[test]
    fn center_maps_to_the_middle_of_the_screen() {
        let camera = Camera::default();
        let center = camera.graph_to_viewport(Point::new(0.5, 0.5), VIEWPORT);
        assert_close(center, Point::new(400.0, 300.0));
    }

    #[test]
    fn one_unit_spans_the_short_side() {
        let camera = Camera::default();
        let left = camera.graph_to_viewport(Point::new(0.0, 0.5), VIEWPORT);
        let right = camera.graph_to_viewport(Point::new(1.0, 0.5), VIEWPORT);
        assert!((right.x - left.x - 600.0).abs() < 1e-3);

        let top = camera.graph_to_viewport(Point::new(0.5, 0.0), VIEWPORT);
        assert!(top.y < 300.0);
    }

    #[test]
    fn viewport_round_trip() {
        let camera = Camera::new(0.2, 0.7, 2.5);
        let point = Point::new(123.0, 456.0);
        let graph = camera.viewport_to_graph(point, VIEWPORT);
        assert_close(camera.graph_to_viewport(graph, VIEWPORT), point);
    }

    #[test]
    fn zoom_keeps_the_anchor_fixed() {
        let mut camera = Camera::default();
        let anchor = Point::new(100.0, 80.0);
        let before = camera.viewport_to_graph(anchor, VIEWPORT);

        camera.zoom(0.5, anchor, VIEWPORT);

        assert_eq!(camera.ratio, 0.5);
        assert_close(camera.viewport_to_graph(anchor, VIEWPORT), before);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom(1e6, Point::ZERO, VIEWPORT);
        assert_eq!(camera.ratio, MAX_RATIO);

        camera.zoom(0.0, Point::ZERO, VIEWPORT);
        assert_eq!(camera.ratio, MAX_RATIO);
    }

    #[test]
    fn pan_follows_the_drag() {
        let mut camera = Camera::default();
        let grabbed = camera.viewport_to_graph(Point::new(400.0, 300.0), VIEWPORT);

        camera.pan(Point::new(60.0, -30.0), VIEWPORT);

        let moved = camera.graph_to_viewport(grabbed, VIEWPORT);
        assert_close(moved, Point::new(460.0, 270.0));
    }

    #[test]
    fn framed_radius_matches_on_screen_size() {
        let camera = Camera::new(0.5, 0.5, 4.0);
        let node = NodeDisplayData::new(0.5, 0.5, 10.0);
        let framed = camera.frame_node(&node, VIEWPORT);

        let edge = Point::new(0.5 + framed.framed_radius.unwrap(), 0.5);
        let pixels = camera
            .graph_to_viewport(edge, VIEWPORT)
            .distance(camera.graph_to_viewport(node.position(), VIEWPORT));

        assert!((pixels - 5.0).abs() < 1e-3);
    }

    #[test]
    fn render_params_carry_the_ratio() {
        let params = Camera::new(0.0, 0.0, 3.0).render_params(VIEWPORT);
        assert_eq!(params.ratio, 3.0);
        assert_eq!(params.correction_ratio, 1.0 / 600.0);
    }
}
