use web_sys::CanvasRenderingContext2d;

use super::{LabelCanvas, TextMeasure};
use crate::color::Color;

/// Browser 2D context used as the label overlay.
#[derive(Clone)]
pub struct WebLabelCanvas {
    context: CanvasRenderingContext2d,
    font_family: String,
}

impl WebLabelCanvas {
    pub fn new(context: CanvasRenderingContext2d, font_family: impl Into<String>) -> Self {
        context.set_text_baseline("middle");
        context.set_text_align("left");
        Self {
            context,
            font_family: font_family.into(),
        }
    }

    pub fn clear(&self, width: f32, height: f32) {
        self.context.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_font(&self, font_size: f32) {
        self.context
            .set_font(&format!("{font_size}px {}", self.font_family));
    }
}

impl LabelCanvas for WebLabelCanvas {
    fn set_global_alpha(&mut self, alpha: f32) {
        self.context.set_global_alpha(alpha as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.set_font(font_size);
        self.context.set_fill_style_str(&color.to_css());
        if let Err(err) = self.context.fill_text(text, x as f64, y as f64) {
            log::warn!("failed to draw label {text:?}: {err:?}");
        }
    }
}

impl TextMeasure for WebLabelCanvas {
    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        self.set_font(font_size);
        match self.context.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(err) => {
                log::warn!("failed to measure label {text:?}: {err:?}");
                0.0
            }
        }
    }
}
