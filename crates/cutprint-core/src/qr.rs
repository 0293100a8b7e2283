//! QR code size and placement geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Default QR edge length as a fraction of the shorter image side.
pub const DEFAULT_QR_RATIO: f64 = 0.10;

/// Smallest QR edge length in pixels.
pub const MIN_QR_SIZE_PX: u32 = 50;

/// Margin between the QR code and the image edge as a fraction of the shorter
/// image side.
pub const QR_MARGIN_RATIO: f64 = 0.05;

// Guards `floor` against products like 80.00000000000001 landing one pixel low
// when the exact value is an integer.
const FLOOR_EPSILON: f64 = 1e-9;

/// Corner the QR code is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QrAnchor {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    #[default]
    BottomRight,
}

impl QrAnchor {
    /// Stable kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            QrAnchor::TopLeft => "top-left",
            QrAnchor::TopRight => "top-right",
            QrAnchor::BottomLeft => "bottom-left",
            QrAnchor::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for QrAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrAnchor {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(QrAnchor::TopLeft),
            "top-right" => Ok(QrAnchor::TopRight),
            "bottom-left" => Ok(QrAnchor::BottomLeft),
            "bottom-right" => Ok(QrAnchor::BottomRight),
            _ => Err(CoreError::InvalidAnchor(raw.to_string())),
        }
    }
}

/// QR box in the coordinate space of the final composed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPlacement {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Edge length in pixels.
    pub size_px: u32,
}

impl QrPlacement {
    /// Returns `true` when the box lies inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.size_px as u64 <= width as u64
            && self.y as u64 + self.size_px as u64 <= height as u64
    }
}

/// Computes `max(floor(min(w, h) * ratio), 50)`.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] when either side is zero and
/// [`CoreError::InvalidQrRatio`] when `ratio` is outside `(0, 1]`.
pub fn calculate_qr_size(width: u32, height: u32, ratio: f64) -> Result<u32, CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(CoreError::InvalidQrRatio(ratio));
    }

    let shorter = width.min(height) as f64;
    let size = (shorter * ratio + FLOOR_EPSILON).floor() as u32;
    Ok(size.max(MIN_QR_SIZE_PX))
}

/// Computes the top-left corner of a `qr_size` box anchored at `anchor`, with a
/// margin of 5% of the shorter image side.
///
/// When the image is smaller than `qr_size + 2 * margin`, the size is clamped
/// to the shorter side and the coordinates are clamped into the image, so the
/// result never extends past the canvas.
pub fn calculate_qr_position(width: u32, height: u32, qr_size: u32, anchor: QrAnchor) -> QrPlacement {
    let size_px = qr_size.min(width).min(height);
    let margin = width.min(height) as f64 * QR_MARGIN_RATIO;

    let far = |extent: u32| (extent as f64 - size_px as f64 - margin + FLOOR_EPSILON).floor();
    let near = (margin + FLOOR_EPSILON).floor();

    let (x, y) = match anchor {
        QrAnchor::TopLeft => (near, near),
        QrAnchor::TopRight => (far(width), near),
        QrAnchor::BottomLeft => (near, far(height)),
        QrAnchor::BottomRight => (far(width), far(height)),
    };

    let clamp = |value: f64, extent: u32| value.clamp(0.0, (extent - size_px) as f64) as u32;

    QrPlacement {
        x: clamp(x, width),
        y: clamp(y, height),
        size_px,
    }
}

/// Convenience wrapper: size then position.
///
/// # Errors
/// Propagates [`calculate_qr_size`] validation errors.
pub fn place_qr(width: u32, height: u32, ratio: f64, anchor: QrAnchor) -> Result<QrPlacement, CoreError> {
    let size = calculate_qr_size(width, height, ratio)?;
    Ok(calculate_qr_position(width, height, size, anchor))
}

#[cfg(test)]
mod tests {
    //! Unit tests for QR sizing and anchoring.

    use super::*;

    #[test]
    fn size_uses_shorter_side_and_floor() {
        assert_eq!(calculate_qr_size(1000, 800, 0.1), Ok(80));
        assert_eq!(calculate_qr_size(100, 100, 0.1), Ok(50));
        assert_eq!(calculate_qr_size(1200, 1200, DEFAULT_QR_RATIO), Ok(120));
    }

    #[test]
    fn size_rejects_bad_inputs() {
        assert!(matches!(calculate_qr_size(0, 10, 0.1), Err(CoreError::InvalidDimensions { .. })));
        assert_eq!(calculate_qr_size(10, 10, 0.0), Err(CoreError::InvalidQrRatio(0.0)));
        assert_eq!(calculate_qr_size(10, 10, 1.5), Err(CoreError::InvalidQrRatio(1.5)));
        assert!(calculate_qr_size(10, 10, f64::NAN).is_err());
    }

    #[test]
    fn bottom_right_matches_reference_geometry() {
        let placement = calculate_qr_position(1000, 800, 80, QrAnchor::BottomRight);
        assert_eq!(placement, QrPlacement { x: 880, y: 680, size_px: 80 });
    }

    #[test]
    fn all_corners_keep_margin() {
        let tl = calculate_qr_position(1000, 800, 80, QrAnchor::TopLeft);
        let tr = calculate_qr_position(1000, 800, 80, QrAnchor::TopRight);
        let bl = calculate_qr_position(1000, 800, 80, QrAnchor::BottomLeft);
        assert_eq!((tl.x, tl.y), (40, 40));
        assert_eq!((tr.x, tr.y), (880, 40));
        assert_eq!((bl.x, bl.y), (40, 680));
    }

    #[test]
    fn degenerate_image_is_clamped() {
        let placement = calculate_qr_position(40, 30, 50, QrAnchor::BottomRight);
        assert_eq!(placement.size_px, 30);
        assert!(placement.fits_within(40, 30));
    }

    #[test]
    fn anchor_parses_kebab_and_snake_case() {
        assert_eq!("bottom_left".parse::<QrAnchor>(), Ok(QrAnchor::BottomLeft));
        assert_eq!("Top-Right".parse::<QrAnchor>(), Ok(QrAnchor::TopRight));
        assert!("center".parse::<QrAnchor>().is_err());
    }
}
