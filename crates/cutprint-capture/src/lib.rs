#![warn(missing_docs)]
//! # cutprint-capture
//!
//! ## Purpose
//! Runs the shooting stage of a session and lets the user pick exactly the
//! photos the chosen cut type needs.
//!
//! ## Responsibilities
//! - Define a backend-agnostic camera trait.
//! - Provide a deterministic synthetic camera for CI and tests.
//! - Plan shot counts and countdown timing per cut type.
//! - Track the ordered photo selection and refuse incomplete ones.
//!
//! ## Data flow
//! [`CapturePlan`] -> [`run_session`] drives a [`CameraBackend`] ->
//! [`CapturedPhoto`] list -> [`PhotoSelection`] -> ordered URIs for the
//! composition request.
//!
//! ## Ownership and lifetimes
//! Captured photos own their encoded bytes; nothing borrows camera buffers
//! past a single capture call.
//!
//! ## Error model
//! Invalid plans, out-of-range picks, incomplete selections and camera
//! failures are reported as [`CaptureError`] values.

use std::io::Cursor;
use std::sync::Mutex;

use cutprint_core::CutType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

/// Extra shots taken beyond the required count by default.
pub const DEFAULT_EXTRA_SHOTS: usize = 2;

/// Default countdown between shots.
pub const DEFAULT_COUNTDOWN_MS: u64 = 3_000;

/// One shot from the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    /// Position in the session, starting at zero.
    pub index: usize,
    /// URI the photo can be loaded from.
    pub uri: String,
    /// Capture time in epoch milliseconds.
    pub captured_at_ms: u64,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Camera implementation.
pub trait CameraBackend: Send + Sync {
    /// Takes shot number `index`.
    ///
    /// # Errors
    /// Returns [`CaptureError::Backend`] when the camera fails.
    fn capture(&self, index: usize, captured_at_ms: u64) -> Result<CapturedPhoto, CaptureError>;
}

/// Deterministic camera producing solid-colour PNG frames.
#[derive(Debug)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    sequence: Mutex<u64>,
}

impl SyntheticCamera {
    /// Creates a camera producing `width x height` frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            sequence: Mutex::new(0),
        }
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(60, 80)
    }
}

impl CameraBackend for SyntheticCamera {
    fn capture(&self, index: usize, captured_at_ms: u64) -> Result<CapturedPhoto, CaptureError> {
        let mut sequence = self
            .sequence
            .lock()
            .map_err(|_| CaptureError::Backend("synthetic sequence lock poisoned".to_string()))?;
        *sequence += 1;

        let shade = (*sequence * 37 % 200) as u8 + 30;
        let frame = RgbaImage::from_pixel(self.width, self.height, Rgba([shade, 255 - shade, 128, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(frame)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|error| CaptureError::Backend(error.to_string()))?;

        Ok(CapturedPhoto {
            index,
            uri: format!("mem://shot-{index}"),
            captured_at_ms,
            width: self.width,
            height: self.height,
            bytes,
        })
    }
}

/// Shot count and timing for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePlan {
    /// Layout the session is shot for.
    pub cut_type: CutType,
    /// Shots to take; at least the required photo count.
    pub shot_count: usize,
    /// Countdown before each shot.
    pub countdown_ms: u64,
}

impl CapturePlan {
    /// Creates a validated plan.
    ///
    /// # Errors
    /// Returns [`CaptureError::TooFewShots`] when fewer shots than the cut type
    /// needs are planned and [`CaptureError::InvalidPlan`] for a zero
    /// countdown.
    pub fn new(cut_type: CutType, shot_count: usize, countdown_ms: u64) -> Result<Self, CaptureError> {
        let required = cut_type.required_photo_count();
        if shot_count < required {
            return Err(CaptureError::TooFewShots {
                required,
                planned: shot_count,
            });
        }
        if countdown_ms == 0 {
            return Err(CaptureError::InvalidPlan("countdown must be positive".to_string()));
        }
        Ok(Self {
            cut_type,
            shot_count,
            countdown_ms,
        })
    }

    /// Default plan: required count plus [`DEFAULT_EXTRA_SHOTS`].
    pub fn for_cut_type(cut_type: CutType) -> Self {
        Self {
            cut_type,
            shot_count: cut_type.required_photo_count() + DEFAULT_EXTRA_SHOTS,
            countdown_ms: DEFAULT_COUNTDOWN_MS,
        }
    }

    /// Shot timestamps; each shot fires after its own countdown.
    pub fn schedule(&self, start_ms: u64) -> Vec<u64> {
        (1..=self.shot_count as u64)
            .map(|step| start_ms.saturating_add(self.countdown_ms.saturating_mul(step)))
            .collect()
    }
}

/// Takes every shot of `plan` in order.
///
/// # Errors
/// Stops at and returns the first camera failure.
pub fn run_session(plan: &CapturePlan, camera: &dyn CameraBackend, start_ms: u64) -> Result<Vec<CapturedPhoto>, CaptureError> {
    let shots = plan
        .schedule(start_ms)
        .into_iter()
        .enumerate()
        .map(|(index, at_ms)| camera.capture(index, at_ms))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("captured {} shots for {}", shots.len(), plan.cut_type);
    Ok(shots)
}

/// Ordered pick of exactly `required_photo_count` shots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSelection {
    cut_type: CutType,
    available: usize,
    picks: Vec<usize>,
}

impl PhotoSelection {
    /// Empty selection over `available` shots.
    pub fn new(cut_type: CutType, available: usize) -> Self {
        Self {
            cut_type,
            available,
            picks: Vec::with_capacity(cut_type.required_photo_count()),
        }
    }

    /// Number of picks needed.
    pub fn required(&self) -> usize {
        self.cut_type.required_photo_count()
    }

    /// Current picks in slot order.
    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    /// Adds `index` if absent, removes it if present. Removal closes the gap so
    /// later picks move up one slot.
    ///
    /// Returns `true` when the shot is selected afterwards.
    ///
    /// # Errors
    /// Returns [`CaptureError::IndexOutOfRange`] for unknown shots and
    /// [`CaptureError::SelectionFull`] when adding to a complete selection.
    pub fn toggle(&mut self, index: usize) -> Result<bool, CaptureError> {
        if index >= self.available {
            return Err(CaptureError::IndexOutOfRange {
                index,
                available: self.available,
            });
        }
        if let Some(position) = self.picks.iter().position(|pick| *pick == index) {
            self.picks.remove(position);
            return Ok(false);
        }
        if self.is_complete() {
            return Err(CaptureError::SelectionFull {
                required: self.required(),
            });
        }
        self.picks.push(index);
        Ok(true)
    }

    /// Returns `true` once exactly the required number of shots is picked.
    pub fn is_complete(&self) -> bool {
        self.picks.len() == self.required()
    }

    /// Slot number of `index`, if picked.
    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.picks.iter().position(|pick| *pick == index)
    }

    /// Resolves the picks against `shots`, in slot order.
    ///
    /// # Errors
    /// Returns [`CaptureError::SelectionIncomplete`] until the selection is
    /// complete.
    pub fn resolve<'a>(&self, shots: &'a [CapturedPhoto]) -> Result<Vec<&'a CapturedPhoto>, CaptureError> {
        if !self.is_complete() {
            return Err(CaptureError::SelectionIncomplete {
                required: self.required(),
                selected: self.picks.len(),
            });
        }
        self.picks
            .iter()
            .map(|index| {
                shots.get(*index).ok_or(CaptureError::IndexOutOfRange {
                    index: *index,
                    available: shots.len(),
                })
            })
            .collect()
    }
}

/// Capture stage errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Plan parameters are unusable.
    #[error("invalid capture plan: {0}")]
    InvalidPlan(String),
    /// Fewer shots planned than the layout needs.
    #[error("capture plan has {planned} shots, layout needs {required}")]
    TooFewShots {
        /// Required photo count.
        required: usize,
        /// Planned shots.
        planned: usize,
    },
    /// Shot index does not exist.
    #[error("shot {index} out of range ({available} available)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Shots available.
        available: usize,
    },
    /// Selection already holds the required count.
    #[error("selection already has {required} photos")]
    SelectionFull {
        /// Required photo count.
        required: usize,
    },
    /// Selection has fewer picks than required.
    #[error("selected {selected} of {required} photos")]
    SelectionIncomplete {
        /// Required photo count.
        required: usize,
        /// Current picks.
        selected: usize,
    },
    /// Camera failure.
    #[error("camera backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for plans and the synthetic camera.

    use super::*;

    #[test]
    fn synthetic_camera_produces_decodable_png() {
        let shot = SyntheticCamera::new(8, 6).capture(3, 42).expect("capture works");
        assert_eq!(shot.uri, "mem://shot-3");
        assert_eq!(shot.captured_at_ms, 42);
        let decoded = image::load_from_memory(&shot.bytes).expect("png decodes");
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn plan_requires_enough_shots() {
        assert_eq!(
            CapturePlan::new(CutType::Grid6, 5, 1_000),
            Err(CaptureError::TooFewShots { required: 6, planned: 5 })
        );
        assert!(CapturePlan::new(CutType::Grid4, 4, 0).is_err());
        assert_eq!(CapturePlan::for_cut_type(CutType::Vertical4).shot_count, 6);
    }
}
