use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::color::Color;
use crate::display::RenderQuality;

/// Renderer configuration. Every field has a default, so a settings file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Edge label font size in pixels at zoom ratio 1.
    pub edge_label_size: f32,
    pub label_font: String,
    /// Font file used to measure labels where no 2D canvas is available.
    pub label_font_file: Option<PathBuf>,
    /// Horizontal padding around label text in pixels at zoom ratio 1.
    pub label_padding: f32,
    pub label_background: Color,
    pub highlight_color: Color,
    pub highlight_opacity: f32,
    /// Camera ratio at which labels start fading out.
    pub label_fade_start: f32,
    /// Camera ratio at which labels are fully transparent.
    pub label_fade_end: f32,
    /// Visible edge count above which arrowheads switch to the fast path.
    pub fast_arrow_edge_threshold: usize,
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            edge_label_size: 12.0,
            label_font: "sans-serif".to_string(),
            label_font_file: None,
            label_padding: 4.0,
            label_background: Color::rgba(255, 255, 255, 179),
            highlight_color: Color::rgb(0x33, 0x66, 0xcc),
            highlight_opacity: 0.25,
            label_fade_start: 2.0,
            label_fade_end: 4.0,
            fast_arrow_edge_threshold: 2_000,
            background: Color::WHITE,
        }
    }
}

impl RenderSettings {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid render settings")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;

        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Arrowhead quality for a frame showing `visible_edges` edges.
    pub fn arrow_quality(&self, visible_edges: usize) -> RenderQuality {
        if visible_edges > self.fast_arrow_edge_threshold {
            RenderQuality::Fast
        } else {
            RenderQuality::Fine
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = RenderSettings::from_json_str(
            r##"{ "edge_label_size": 16, "highlight_color": "#ff0000" }"##,
        )
        .unwrap();

        assert_eq!(settings.edge_label_size, 16.0);
        assert_eq!(settings.highlight_color, Color::rgb(255, 0, 0));
        assert_eq!(settings.label_fade_end, RenderSettings::default().label_fade_end);
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = RenderSettings::from_json_str(r#"{ "background": "plaid" }"#).unwrap_err();
        assert!(format!("{err:#}").contains("plaid"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RenderSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn dense_frames_use_fast_arrows() {
        let settings = RenderSettings {
            fast_arrow_edge_threshold: 10,
            ..Default::default()
        };

        assert_eq!(settings.arrow_quality(10), RenderQuality::Fine);
        assert_eq!(settings.arrow_quality(11), RenderQuality::Fast);
    }
}
