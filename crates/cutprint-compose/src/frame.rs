//! Frame background rendering.

use cutprint_catalog::{FrameKind, GradientDirection, PatternKind, TextureKind};
use cutprint_core::Rgb;
use image::{Rgba, RgbaImage, imageops};

use crate::source::PhotoSource;

/// Paints the frame background over rows `0..height` of `canvas`.
///
/// Slots are drawn on top afterwards, so whatever remains visible between and
/// around them is the frame.
pub fn paint_frame(canvas: &mut RgbaImage, height: u32, kind: &FrameKind, source: &dyn PhotoSource) {
    let width = canvas.width();
    let height = height.min(canvas.height());

    match kind {
        FrameKind::Solid { border_color, .. } => fill(canvas, width, height, |_, _| *border_color),
        FrameKind::Gradient {
            colors, direction, ..
        } => fill(canvas, width, height, |x, y| {
            gradient_at(colors, *direction, x, y, width, height)
        }),
        FrameKind::Pattern {
            pattern,
            background,
            foreground,
            spacing,
            ..
        } => fill(canvas, width, height, |x, y| {
            if pattern_hit(*pattern, x, y, (*spacing).max(2)) {
                *foreground
            } else {
                *background
            }
        }),
        FrameKind::Texture {
            texture,
            color,
            border_width,
        } => fill(canvas, width, height, |x, y| {
            texture_at(*texture, *color, x, y, width, (*border_width).max(4))
        }),
        FrameKind::Image {
            source_uri,
            fallback_color,
            ..
        } => match load_background(source, source_uri, width, height) {
            Some(background) => imageops::replace(canvas, &background, 0, 0),
            None => fill(canvas, width, height, |_, _| *fallback_color),
        },
    }
}

fn fill(canvas: &mut RgbaImage, width: u32, height: u32, color_at: impl Fn(u32, u32) -> Rgb) {
    for y in 0..height {
        for x in 0..width {
            canvas.put_pixel(x, y, Rgba(color_at(x, y).to_rgba()));
        }
    }
}

fn gradient_at(colors: &[Rgb], direction: GradientDirection, x: u32, y: u32, width: u32, height: u32) -> Rgb {
    let ratio = |value: u32, extent: u32| {
        if extent <= 1 {
            0.0
        } else {
            value as f64 / (extent - 1) as f64
        }
    };

    // No native radial primitive: radial gradients render as diagonal.
    let t = match direction {
        GradientDirection::Horizontal => ratio(x, width),
        GradientDirection::Vertical => ratio(y, height),
        GradientDirection::Diagonal | GradientDirection::Radial => {
            ratio(x + y, (width + height).saturating_sub(1))
        }
    };

    match colors {
        [] => Rgb::BLACK,
        [only] => *only,
        _ => {
            let segments = (colors.len() - 1) as f64;
            let position = t * segments;
            let index = (position.floor() as usize).min(colors.len() - 2);
            colors[index].lerp(colors[index + 1], position - index as f64)
        }
    }
}

fn pattern_hit(pattern: PatternKind, x: u32, y: u32, spacing: u32) -> bool {
    match pattern {
        PatternKind::Dots => {
            let center = spacing as i64 / 2;
            let radius = (spacing as i64 / 4).max(1);
            let dx = (x % spacing) as i64 - center;
            let dy = (y % spacing) as i64 - center;
            dx * dx + dy * dy <= radius * radius
        }
        PatternKind::Stripes => ((x + y) / (spacing / 2).max(1)) % 2 == 0,
        PatternKind::Checker => ((x / spacing) + (y / spacing)) % 2 == 0,
    }
}

fn texture_at(texture: TextureKind, base: Rgb, x: u32, y: u32, width: u32, band: u32) -> Rgb {
    match texture {
        TextureKind::Paper => shift(base, (grain(x, y) % 13) as i16 - 6),
        TextureKind::Linen => {
            let weave = if x % 4 == 0 || y % 4 == 0 { -18 } else { 0 };
            shift(base, weave + (grain(x, y) % 5) as i16 - 2)
        }
        TextureKind::Film => {
            let in_left = x < band;
            let in_right = x >= width.saturating_sub(band);
            let across = if in_left { x } else { x.wrapping_sub(width.saturating_sub(band)) };
            let along = y % band;
            let hole = (in_left || in_right)
                && (band / 4..band * 3 / 4).contains(&across)
                && (band / 3..band * 2 / 3).contains(&along);
            if hole { Rgb::new(0xEE, 0xEE, 0xEE) } else { base }
        }
    }
}

fn shift(color: Rgb, delta: i16) -> Rgb {
    let apply = |channel: u8| (channel as i16 + delta).clamp(0, 255) as u8;
    Rgb::new(apply(color.r), apply(color.g), apply(color.b))
}

// Integer hash; textures must be reproducible across runs.
fn grain(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263);
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^ (h >> 16)
}

fn load_background(source: &dyn PhotoSource, uri: &str, width: u32, height: u32) -> Option<RgbaImage> {
    let decoded = source
        .load(uri)
        .map_err(|error| error.to_string())
        .and_then(|bytes| image::load_from_memory(&bytes).map_err(|error| error.to_string()));

    match decoded {
        Ok(image) => Some(imageops::resize(
            &image.to_rgba8(),
            width,
            height,
            imageops::FilterType::Triangle,
        )),
        Err(reason) => {
            log::warn!("frame background {uri} unavailable, using fallback colour: {reason}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for frame painting.

    use crate::source::MemorySource;

    use super::*;

    #[test]
    fn gradient_runs_from_first_to_last_stop() {
        let colors = [Rgb::BLACK, Rgb::WHITE];
        assert_eq!(gradient_at(&colors, GradientDirection::Horizontal, 0, 5, 11, 11), Rgb::BLACK);
        assert_eq!(gradient_at(&colors, GradientDirection::Horizontal, 10, 5, 11, 11), Rgb::WHITE);
        assert_eq!(
            gradient_at(&colors, GradientDirection::Vertical, 0, 5, 11, 11),
            Rgb::new(128, 128, 128)
        );
    }

    #[test]
    fn radial_renders_as_diagonal() {
        let colors = [Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)];
        for (x, y) in [(0, 0), (3, 7), (9, 9)] {
            assert_eq!(
                gradient_at(&colors, GradientDirection::Radial, x, y, 10, 10),
                gradient_at(&colors, GradientDirection::Diagonal, x, y, 10, 10)
            );
        }
    }

    #[test]
    fn textures_are_deterministic() {
        let kind = FrameKind::Texture {
            border_width: 8,
            texture: TextureKind::Paper,
            color: Rgb::new(200, 190, 180),
        };
        let mut a = RgbaImage::new(16, 16);
        let mut b = RgbaImage::new(16, 16);
        paint_frame(&mut a, 16, &kind, &MemorySource::new());
        paint_frame(&mut b, 16, &kind, &MemorySource::new());
        assert_eq!(a, b);
    }

    #[test]
    fn missing_image_background_uses_fallback() {
        let kind = FrameKind::Image {
            border_width: 4,
            source_uri: "mem://missing".to_string(),
            fallback_color: Rgb::new(1, 2, 3),
        };
        let mut canvas = RgbaImage::new(4, 4);
        paint_frame(&mut canvas, 4, &kind, &MemorySource::new());
        assert_eq!(canvas.get_pixel(3, 3).0, [1, 2, 3, 255]);
    }
}
