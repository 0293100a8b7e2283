//! Label strip rendering beneath the frame.

use cutprint_core::{Rgb, contrast_text_color};
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};

use crate::CompositionError;

// Glyph height as a share of the strip height.
const TEXT_SCALE: f32 = 0.55;

/// Draws label text centred in a coloured strip.
///
/// Without a font the strip is still painted so the canvas geometry does not
/// depend on font availability.
#[derive(Clone, Default)]
pub struct LabelRenderer {
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for LabelRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl LabelRenderer {
    /// Renderer that paints strips without glyphs.
    pub fn without_font() -> Self {
        Self::default()
    }

    /// Loads a TrueType/OpenType font from raw bytes.
    ///
    /// # Errors
    /// Returns [`CompositionError::Font`] when the bytes are not a usable font.
    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self, CompositionError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| CompositionError::Font("font data could not be parsed".to_string()))?;
        Ok(Self { font: Some(font) })
    }

    /// Returns `true` when glyphs will be drawn.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Fills rows `top..top + height` with `background` and draws `text`
    /// centred in the contrasting text colour.
    pub fn render(&self, canvas: &mut RgbaImage, top: u32, height: u32, background: Rgb, text: &str) {
        let width = canvas.width();
        let bottom = top.saturating_add(height).min(canvas.height());
        let fill = Rgba(background.to_rgba());
        for y in top..bottom {
            for x in 0..width {
                canvas.put_pixel(x, y, fill);
            }
        }

        if text.is_empty() || height == 0 {
            return;
        }
        let Some(font) = &self.font else {
            log::warn!("no label font configured; label strip drawn without text");
            return;
        };

        let color = contrast_text_color(background).rgb();
        let scale = Scale::uniform(height as f32 * TEXT_SCALE);
        let metrics = font.v_metrics(scale);
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, metrics.ascent)).collect();

        let text_width = glyphs
            .iter()
            .filter_map(|glyph| glyph.pixel_bounding_box())
            .map(|bounds| bounds.max.x)
            .max()
            .unwrap_or(0);
        let text_height = (metrics.ascent - metrics.descent).ceil() as i32;
        let origin_x = (width as i32 - text_width) / 2;
        let origin_y = top as i32 + (height as i32 - text_height) / 2;

        for glyph in &glyphs {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = origin_x + bounds.min.x + gx as i32;
                let y = origin_y + bounds.min.y + gy as i32;
                if x < 0 || y < top as i32 || x >= width as i32 || y >= bottom as i32 {
                    return;
                }
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                let alpha = coverage.clamp(0.0, 1.0);
                let blend = |dst: u8, src: u8| (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
                pixel.0 = [
                    blend(pixel.0[0], color.r),
                    blend(pixel.0[1], color.g),
                    blend(pixel.0[2], color.b),
                    255,
                ];
            });
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for label strips.

    use super::*;

    #[test]
    fn strip_is_painted_without_font() {
        let mut canvas = RgbaImage::from_pixel(8, 10, Rgba([0, 0, 0, 255]));
        LabelRenderer::without_font().render(&mut canvas, 6, 4, Rgb::new(10, 20, 30), "hello");
        assert_eq!(canvas.get_pixel(0, 5).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(7, 9).0, [10, 20, 30, 255]);
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let error = LabelRenderer::from_font_bytes(vec![0, 1, 2, 3]).expect_err("not a font");
        assert!(matches!(error, CompositionError::Font(_)));
    }
}
