//! Edge labels drawn on a 2D canvas overlay.
//!
//! The anchor is the midpoint (`t = 0.5`) of the same curve the GPU program
//! draws for the edge, so a label always rides on its edge. Box and text are
//! scaled by the inverse square root of the zoom ratio and fade out as the
//! camera zooms out.

mod measure;
#[cfg(target_arch = "wasm32")]
mod web;

pub use measure::GlyphMeasure;
#[cfg(target_arch = "wasm32")]
pub use web::WebLabelCanvas;

use crate::bezier;
use crate::color::Color;
use crate::display::{EdgeDisplayData, EdgeKind, NodeDisplayData};
use crate::math::{Point, clamp};
use crate::programs::curved::edge_curve;
use crate::programs::self_loop::self_loop_curve;
use crate::settings::RenderSettings;

/// Label box height as a multiple of the font size.
const LABEL_HEIGHT_FACTOR: f32 = 1.4;

/// Pixel width of `text` at `font_size`.
pub trait TextMeasure {
    fn measure_text(&self, text: &str, font_size: f32) -> f32;
}

/// The subset of a 2D canvas the label drawer needs. Text is drawn left
/// aligned with `y` on its vertical middle.
pub trait LabelCanvas {
    fn set_global_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelCommand {
    GlobalAlpha(f32),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
    },
}

/// A canvas that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<LabelCommand>,
}

impl LabelCanvas for DrawList {
    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(LabelCommand::GlobalAlpha(alpha));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(LabelCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.commands.push(LabelCommand::Text {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }
}

/// Where a label goes and how big its background is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub anchor: Point,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text_width: f32,
    pub font_size: f32,
    pub padding: f32,
}

impl LabelLayout {
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.x
            && point.x < self.x + self.width
            && point.y > self.y
            && point.y < self.y + self.height
    }

    pub fn text_origin(&self) -> Point {
        Point::new(self.x + self.padding, self.y + self.height * 0.5)
    }
}

/// Midpoint of the curve the edge is drawn with.
pub fn label_anchor(
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
) -> Point {
    match edge.kind {
        EdgeKind::SelfLoop => self_loop_curve(source, edge).point_at(0.5),
        EdgeKind::Curved => edge_curve(source, target, edge).point_at(0.5),
        EdgeKind::Straight => match edge.control {
            Some(_) => edge_curve(source, target, edge).point_at(0.5),
            None => bezier::midpoint(source.position(), target.position()),
        },
    }
}

/// Font size of edge labels at the edge's zoom.
pub fn label_font_size(edge: &EdgeDisplayData, settings: &RenderSettings) -> f32 {
    settings.edge_label_size * edge.inverse_sqrt_zoom()
}

/// Lays out a label whose text measures `text_width` at the label font size.
/// Returns `None` when there is nothing sensible to draw.
pub fn layout_label(
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
    text_width: f32,
    settings: &RenderSettings,
) -> Option<LabelLayout> {
    if text_width <= 0.0 || !text_width.is_finite() {
        return None;
    }

    let distance = bezier::line_length(source.position(), target.position());
    if edge.kind != EdgeKind::SelfLoop && distance == 0.0 {
        return None;
    }

    let inverse_sqrt_zoom = edge.inverse_sqrt_zoom();
    let anchor = label_anchor(source, target, edge);
    let font_size = label_font_size(edge, settings);
    let padding = settings.label_padding * inverse_sqrt_zoom;
    let height = font_size * LABEL_HEIGHT_FACTOR;

    Some(LabelLayout {
        anchor,
        x: anchor.x - text_width * 0.5 - padding,
        y: anchor.y + edge.thickness() * 0.5 * inverse_sqrt_zoom - font_size,
        width: text_width + 2.0 * padding,
        height,
        text_width,
        font_size,
        padding,
    })
}

/// Label opacity at camera `ratio`: opaque up to `label_fade_start`,
/// transparent from `label_fade_end`, linear in between.
pub fn label_opacity(ratio: f32, settings: &RenderSettings) -> f32 {
    let start = settings.label_fade_start;
    let end = settings.label_fade_end;

    if end <= start {
        return if ratio < end { 1.0 } else { 0.0 };
    }

    clamp((end - ratio) / (end - start), 0.0, 1.0)
}

/// Draws one edge's label. Returns its layout so the host can hit test it.
pub fn draw_edge_label<C: LabelCanvas, M: TextMeasure>(
    canvas: &mut C,
    measure: &M,
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
    ratio: f32,
    settings: &RenderSettings,
) -> Option<LabelLayout> {
    let label = edge.label.as_deref().filter(|l| !l.is_empty())?;

    let fade = label_opacity(ratio, settings);
    if fade <= 0.0 {
        return None;
    }

    let font_size = label_font_size(edge, settings);
    let text_width = measure.measure_text(label, font_size);
    let layout = layout_label(source, target, edge, text_width, settings)?;

    let (background, text_color) = if edge.selected {
        (
            settings.highlight_color.with_alpha(settings.highlight_opacity),
            settings.highlight_color,
        )
    } else {
        (settings.label_background, edge.color)
    };

    canvas.set_global_alpha(fade);
    canvas.fill_rect(layout.x, layout.y, layout.width, layout.height, background);

    let origin = layout.text_origin();
    canvas.fill_text(label, origin.x, origin.y, layout.font_size, text_color);
    canvas.set_global_alpha(1.0);

    Some(layout)
}

/// First label, in draw order, containing `point`.
pub fn hit_test(layouts: &[(usize, LabelLayout)], point: Point) -> Option<usize> {
    layouts
        .iter()
        .find(|(_, layout)| layout.contains(point))
        .map(|(edge, _)| *edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is half the font size wide.
    struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn measure_text(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * font_size * 0.5
        }
    }

    fn nodes() -> (NodeDisplayData, NodeDisplayData) {
        (
            NodeDisplayData::new(0.0, 0.0, 5.0),
            NodeDisplayData::new(100.0, 0.0, 5.0),
        )
    }

    fn labeled(kind: EdgeKind) -> EdgeDisplayData {
        EdgeDisplayData {
            label: Some("MemberOf".to_string()),
            color: Color::rgb(10, 20, 30),
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn anchor_follows_the_curve() {
        let (source, target) = nodes();
        let mut edge = labeled(EdgeKind::Curved);
        edge.group_size = 2;

        let anchor = label_anchor(&source, &target, &edge);
        let expected = edge_curve(&source, &target, &edge).point_at(0.5);
        assert_eq!(anchor, expected);
        assert!(anchor.y.abs() > 1.0);

        let straight = label_anchor(&source, &target, &labeled(EdgeKind::Straight));
        assert_eq!(straight, Point::new(50.0, 0.0));
    }

    #[test]
    fn self_loop_anchor_sits_on_the_loop() {
        let (node, _) = nodes();
        let edge = labeled(EdgeKind::SelfLoop);

        let anchor = label_anchor(&node, &node, &edge);
        assert_eq!(anchor, self_loop_curve(&node, &edge).point_at(0.5));
        assert!(layout_label(&node, &node, &edge, 20.0, &RenderSettings::default()).is_some());
    }

    #[test]
    fn box_scales_with_zoom() {
        let (source, target) = nodes();
        let settings = RenderSettings::default();
        let mut edge = labeled(EdgeKind::Straight);

        let near = layout_label(&source, &target, &edge, 40.0, &settings).unwrap();
        edge.inverse_sqrt_zoom_ratio = 0.5;
        let far = layout_label(&source, &target, &edge, 40.0, &settings).unwrap();

        assert_eq!(near.width, 40.0 + 8.0);
        assert_eq!(far.width, 40.0 + 4.0);
        assert_eq!(near.height, 12.0 * 1.4);
        assert_eq!(far.height, 6.0 * 1.4);
        assert!((near.x + near.width * 0.5 - 50.0).abs() < 1e-4);
    }

    #[test]
    fn coincident_nodes_and_empty_text_are_skipped() {
        let (source, _) = nodes();
        let settings = RenderSettings::default();

        assert!(layout_label(&source, &source, &labeled(EdgeKind::Curved), 10.0, &settings).is_none());

        let (source, target) = nodes();
        assert!(layout_label(&source, &target, &labeled(EdgeKind::Curved), 0.0, &settings).is_none());
    }

    #[test]
    fn opacity_fades_monotonically() {
        let settings = RenderSettings::default();
        let mut previous = f32::INFINITY;

        for step in 0..100 {
            let ratio = step as f32 * 0.1;
            let opacity = label_opacity(ratio, &settings);
            assert!((0.0..=1.0).contains(&opacity));
            assert!(opacity <= previous);
            previous = opacity;
        }

        assert_eq!(label_opacity(0.5, &settings), 1.0);
        assert_eq!(label_opacity(3.0, &settings), 0.5);
        assert_eq!(label_opacity(9.0, &settings), 0.0);
    }

    #[test]
    fn draws_background_then_text() {
        let (source, target) = nodes();
        let settings = RenderSettings::default();
        let mut canvas = DrawList::default();

        let layout = draw_edge_label(
            &mut canvas,
            &FixedWidth,
            &source,
            &target,
            &labeled(EdgeKind::Curved),
            3.0,
            &settings,
        )
        .unwrap();

        assert_eq!(layout.text_width, 8.0 * 6.0);
        match canvas.commands.as_slice() {
            [
                LabelCommand::GlobalAlpha(fade),
                LabelCommand::Rect { color: background, .. },
                LabelCommand::Text { text, color, .. },
                LabelCommand::GlobalAlpha(reset),
            ] => {
                assert_eq!(*fade, 0.5);
                assert_eq!(*background, settings.label_background);
                assert_eq!(text, "MemberOf");
                assert_eq!(*color, Color::rgb(10, 20, 30));
                assert_eq!(*reset, 1.0);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn selected_labels_use_the_highlight() {
        let (source, target) = nodes();
        let settings = RenderSettings::default();
        let mut canvas = DrawList::default();
        let mut edge = labeled(EdgeKind::Curved);
        edge.selected = true;

        draw_edge_label(&mut canvas, &FixedWidth, &source, &target, &edge, 1.0, &settings).unwrap();

        let highlight = settings.highlight_color;
        assert!(canvas.commands.iter().any(|c| matches!(
            c,
            LabelCommand::Rect { color, .. } if *color == highlight.with_alpha(settings.highlight_opacity)
        )));
        assert!(canvas.commands.iter().any(|c| matches!(
            c,
            LabelCommand::Text { color, .. } if *color == highlight
        )));
    }

    #[test]
    fn faded_out_labels_draw_nothing() {
        let (source, target) = nodes();
        let mut canvas = DrawList::default();

        let layout = draw_edge_label(
            &mut canvas,
            &FixedWidth,
            &source,
            &target,
            &labeled(EdgeKind::Curved),
            10.0,
            &RenderSettings::default(),
        );

        assert!(layout.is_none());
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn hit_test_finds_the_label_under_the_pointer() {
        let (source, target) = nodes();
        let settings = RenderSettings::default();
        let layout = layout_label(&source, &target, &labeled(EdgeKind::Straight), 30.0, &settings).unwrap();
        let layouts = vec![(7, layout)];

        assert_eq!(hit_test(&layouts, Point::new(50.0, -2.0)), Some(7));
        assert_eq!(hit_test(&layouts, Point::new(50.0, 40.0)), None);
    }
}
