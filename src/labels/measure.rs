use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use anyhow::Context;

use super::TextMeasure;

/// Measures label text with a loaded font, kerning included.
#[derive(Clone)]
pub struct GlyphMeasure {
    font: FontArc,
}

impl GlyphMeasure {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(bytes).context("invalid label font")?;
        Ok(Self::new(font))
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        Self::from_bytes(bytes)
    }
}

impl TextMeasure for GlyphMeasure {
    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        if font_size <= 0.0 {
            return 0.0;
        }

        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let mut width = 0.0;
        let mut prev = None;

        for ch in text.chars() {
            let gid = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, gid);
            }
            width += scaled.h_advance(gid);
            prev = Some(gid);
        }

        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = GlyphMeasure::from_bytes(vec![0, 1, 2, 3]).err().unwrap();
        assert!(err.to_string().contains("font"));
    }

    #[test]
    fn missing_font_file_names_the_path() {
        let err = GlyphMeasure::load("/no/such/font.ttf").err().unwrap();
        assert!(err.to_string().contains("/no/such/font.ttf"));
    }
}
