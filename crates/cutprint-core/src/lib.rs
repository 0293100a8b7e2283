#![warn(missing_docs)]
//! # cutprint-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `cutprint` workspace.
//!
//! ## Responsibilities
//! - Resolve cut types into photo counts, slot aspect ratios and grid
//!   arrangements, and lay slots out on a canvas.
//! - Parse colours and pick a readable text colour for a background.
//! - Compute QR code size and placement against a composed image.
//! - Describe backend photo entities exchanged over the REST boundary.
//!
//! ## Data flow
//! Capture stage picks a [`CutType`] -> [`CanvasLayout`] fixes slot geometry ->
//! composition renders into it -> [`calculate_qr_size`] and
//! [`calculate_qr_position`] place the QR code on the final canvas.
//!
//! ## Ownership and lifetimes
//! Every value here is a small owned value or `Copy` type. Geometry functions
//! are pure and keep no state between calls.
//!
//! ## Error model
//! Unknown identifiers and out-of-range inputs fail with [`CoreError`]; no
//! function silently substitutes a default cut type or colour.
//!
//! ## Example
//! ```rust
//! use cutprint_core::{CutType, QrAnchor, calculate_qr_position, calculate_qr_size};
//!
//! assert_eq!(CutType::Grid6.required_photo_count(), 6);
//! let size = calculate_qr_size(1000, 800, 0.1).unwrap();
//! let placement = calculate_qr_position(1000, 800, size, QrAnchor::BottomRight);
//! assert_eq!((placement.x, placement.y, placement.size_px), (880, 680, 80));
//! ```

mod color;
mod layout;
mod photo;
mod qr;

pub use color::{Rgb, TextColor, contrast_text_color, relative_luminance};
pub use layout::{CanvasLayout, CutType, GridArrangement, SlotAspect, SlotRect};
pub use photo::{Photo, SavedPhoto, UploadPhotoRequest, VisibilityUpdate, Visibility};
pub use qr::{
    DEFAULT_QR_RATIO, MIN_QR_SIZE_PX, QR_MARGIN_RATIO, QrAnchor, QrPlacement,
    calculate_qr_position, calculate_qr_size, place_qr,
};

use thiserror::Error;

/// Maximum label length rendered beneath a frame, in characters.
pub const MAX_LABEL_CHARS: usize = 12;

/// Validates a frame label.
///
/// # Errors
/// Returns [`CoreError::LabelTooLong`] when the label exceeds
/// [`MAX_LABEL_CHARS`] characters.
pub fn validate_label(label: &str) -> Result<(), CoreError> {
    let count = label.chars().count();
    if count > MAX_LABEL_CHARS {
        return Err(CoreError::LabelTooLong {
            max: MAX_LABEL_CHARS,
            actual: count,
        });
    }
    Ok(())
}

/// Error type for core model validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Cut type identifier is not one of the supported layouts.
    #[error("invalid cut type: {0}")]
    InvalidCutType(String),
    /// Colour string is not `#RGB` or `#RRGGBB`.
    #[error("invalid colour: {0}")]
    InvalidColor(String),
    /// QR size ratio must be in `(0, 1]`.
    #[error("invalid qr ratio: {0}")]
    InvalidQrRatio(f64),
    /// Image dimensions must be strictly positive.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// QR anchor identifier is unknown.
    #[error("invalid qr anchor: {0}")]
    InvalidAnchor(String),
    /// Visibility identifier is unknown.
    #[error("invalid visibility: {0}")]
    InvalidVisibility(String),
    /// Label text exceeds the strip capacity.
    #[error("label too long: max {max} characters, got {actual}")]
    LabelTooLong {
        /// Maximum character count.
        max: usize,
        /// Actual character count.
        actual: usize,
    },
    /// Canvas geometry overflowed `u32`.
    #[error("canvas dimension overflow")]
    Overflow,
}
