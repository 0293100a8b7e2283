//! QR rasterisation and overlay.

use cutprint_core::QrPlacement;
use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::CompositionError;

/// Light modules required around the symbol by the QR standard.
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Error correction level used for overlaid codes.
///
/// Anything below medium does not survive print and rescan reliably, so the
/// low level is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrErrorCorrection {
    /// About 15% recovery.
    #[default]
    Medium,
    /// About 25% recovery.
    Quartile,
    /// About 30% recovery.
    High,
}

impl QrErrorCorrection {
    fn level(self) -> EcLevel {
        match self {
            QrErrorCorrection::Medium => EcLevel::M,
            QrErrorCorrection::Quartile => EcLevel::Q,
            QrErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Draws a QR code for `payload` into `placement` on `canvas`.
///
/// A white plate slightly larger than the box is painted first; the symbol
/// including its quiet zone is scaled by an integer factor and centred inside.
///
/// # Errors
/// Returns [`CompositionError::QrEncoding`] when the payload cannot be encoded
/// and [`CompositionError::QrPayloadTooLarge`] when a module would be smaller
/// than one pixel.
pub fn render_qr(
    canvas: &mut RgbaImage,
    payload: &str,
    placement: QrPlacement,
    correction: QrErrorCorrection,
) -> Result<(), CompositionError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), correction.level())
        .map_err(|error| CompositionError::QrEncoding(error.to_string()))?;
    let modules = code.width() as u32;
    let total = modules + 2 * QUIET_ZONE_MODULES;
    let scale = placement.size_px / total;
    if scale == 0 {
        return Err(CompositionError::QrPayloadTooLarge {
            modules,
            size_px: placement.size_px,
        });
    }

    paint_plate(canvas, placement);

    let offset = (placement.size_px - total * scale) / 2 + QUIET_ZONE_MODULES * scale;
    let origin_x = placement.x + offset;
    let origin_y = placement.y + offset;

    for (index, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let column = index as u32 % modules;
        let row = index as u32 / modules;
        for dy in 0..scale {
            for dx in 0..scale {
                let x = origin_x + column * scale + dx;
                let y = origin_y + row * scale + dy;
                if x < canvas.width() && y < canvas.height() {
                    canvas.put_pixel(x, y, DARK);
                }
            }
        }
    }

    log::debug!(
        "qr drawn at ({}, {}) size {} with {} modules at scale {}",
        placement.x,
        placement.y,
        placement.size_px,
        modules,
        scale
    );
    Ok(())
}

// Opaque backing so the code scans regardless of the photo underneath.
fn paint_plate(canvas: &mut RgbaImage, placement: QrPlacement) {
    let padding = (placement.size_px / 16).max(2);
    let left = placement.x.saturating_sub(padding);
    let top = placement.y.saturating_sub(padding);
    let right = (placement.x + placement.size_px + padding).min(canvas.width());
    let bottom = (placement.y + placement.size_px + padding).min(canvas.height());

    for y in top..bottom {
        for x in left..right {
            canvas.put_pixel(x, y, LIGHT);
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for QR rasterisation.

    use super::*;

    #[test]
    fn corners_of_the_box_stay_light_and_finder_is_dark() {
        let mut canvas = RgbaImage::from_pixel(300, 300, Rgba([255, 0, 0, 255]));
        let placement = QrPlacement { x: 100, y: 100, size_px: 120 };
        render_qr(&mut canvas, "https://cutprint.app/p/1", placement, QrErrorCorrection::Medium)
            .expect("payload fits");

        assert_eq!(*canvas.get_pixel(100, 100), LIGHT);
        assert_eq!(*canvas.get_pixel(219, 219), LIGHT);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 0, 0, 255]));

        let code = QrCode::with_error_correction_level(b"https://cutprint.app/p/1", EcLevel::M)
            .expect("encodable");
        let total = code.width() as u32 + 2 * QUIET_ZONE_MODULES;
        let scale = 120 / total;
        let offset = (120 - total * scale) / 2 + QUIET_ZONE_MODULES * scale;
        assert_eq!(*canvas.get_pixel(100 + offset, 100 + offset), DARK);
    }

    #[test]
    fn tiny_box_reports_payload_too_large() {
        let mut canvas = RgbaImage::new(64, 64);
        let placement = QrPlacement { x: 0, y: 0, size_px: 20 };
        let error = render_qr(&mut canvas, "https://cutprint.app/p/1", placement, QrErrorCorrection::High)
            .expect_err("20px cannot hold a symbol with quiet zone");
        assert!(matches!(error, CompositionError::QrPayloadTooLarge { size_px: 20, .. }));
    }
}
