#![warn(missing_docs)]
//! # cutprint-compose
//!
//! ## Purpose
//! Turns the photos of one editing session into a single print-ready raster:
//! slots laid out per cut type, filter applied, frame painted, label strip
//! drawn and an optional scannable QR code overlaid.
//!
//! ## Responsibilities
//! - Validate a [`CompositionRequest`] before any pixel work.
//! - Resolve photo URIs through an injected [`PhotoSource`].
//! - Fit each photo into its slot without cropping, padding with the frame.
//! - Apply filter math and colour overlays per slot.
//! - Paint every frame kind, the label strip and the QR overlay.
//! - Encode to PNG or JPEG.
//!
//! ## Data flow
//! [`CompositionRequest`] -> [`CompositionEngine::compose`] -> canvas layout
//! -> frame -> photos -> label -> QR -> [`ComposedImage`] bytes.
//!
//! ## Ownership and lifetimes
//! The engine owns its options and shares the photo source through `Arc`.
//! Every call allocates its own canvas; nothing is cached between calls, so
//! identical requests produce identical bytes.
//!
//! ## Error model
//! All failures are typed [`CompositionError`] values. Callers are expected to
//! fall back to the uncomposed original on any of them.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use cutprint_catalog::global;
//! use cutprint_compose::{CompositionEngine, CompositionRequest, EngineOptions, FileSystemSource};
//! use cutprint_core::CutType;
//!
//! let catalog = global();
//! let request = CompositionRequest::new(
//!     CutType::Grid4,
//!     vec!["a.png".into(), "b.png".into(), "c.png".into(), "d.png".into()],
//!     catalog.require_filter("bw_classic")?.clone(),
//!     catalog.require_frame("thin_black")?.clone(),
//! )
//! .with_qr_payload("https://cutprint.app/p/42");
//! let engine = CompositionEngine::new(EngineOptions::default(), Arc::new(FileSystemSource));
//! let composed = engine.compose(&request)?;
//! println!("{}x{}", composed.width, composed.height);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod filter;
mod frame;
mod label;
mod qr;
mod source;

use std::io::Cursor;
use std::sync::Arc;

use cutprint_catalog::{FilterEffect, FrameStyle};
use cutprint_core::{
    CanvasLayout, CoreError, CutType, DEFAULT_QR_RATIO, QrAnchor, QrPlacement, Rgb, SlotRect,
    place_qr, validate_label,
};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage, imageops};
use thiserror::Error;

pub use filter::{apply_adjustments, apply_overlay};
pub use frame::paint_frame;
pub use label::LabelRenderer;
pub use qr::{QUIET_ZONE_MODULES, QrErrorCorrection, render_qr};
pub use source::{FileSystemSource, MemorySource, PhotoSource, SourceError};

/// Lowest JPEG quality accepted for print output.
pub const MIN_JPEG_QUALITY: u8 = 90;

/// Default slot width in pixels.
pub const DEFAULT_SLOT_WIDTH: u32 = 600;

/// Default label strip height in pixels.
pub const DEFAULT_LABEL_STRIP_HEIGHT: u32 = 96;

/// Largest canvas the engine will allocate.
pub const MAX_CANVAS_PIXELS: u64 = 64_000_000;

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless PNG; keeps QR edges crisp.
    #[default]
    Png,
    /// JPEG at the given quality (90..=100).
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }

    fn validate(self) -> Result<(), CompositionError> {
        match self {
            OutputFormat::Jpeg { quality } if !(MIN_JPEG_QUALITY..=100).contains(&quality) => {
                Err(CompositionError::InvalidRequest(format!(
                    "jpeg quality {quality} outside {MIN_JPEG_QUALITY}..=100"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Engine-wide rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Width of one photo slot; slot height follows the cut aspect ratio.
    pub slot_width: u32,
    /// Height of the label strip when a label is present.
    pub label_strip_height: u32,
    /// QR edge as a share of the shorter canvas side.
    pub qr_ratio: f64,
    /// Corner the QR code is anchored to.
    pub qr_anchor: QrAnchor,
    /// Error correction level of the QR code.
    pub qr_error_correction: QrErrorCorrection,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            slot_width: DEFAULT_SLOT_WIDTH,
            label_strip_height: DEFAULT_LABEL_STRIP_HEIGHT,
            qr_ratio: DEFAULT_QR_RATIO,
            qr_anchor: QrAnchor::default(),
            qr_error_correction: QrErrorCorrection::default(),
        }
    }
}

/// One unit of composition work, consumed by a single
/// [`CompositionEngine::compose`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    /// Photo URIs in slot order.
    pub source_uris: Vec<String>,
    /// Layout.
    pub cut_type: CutType,
    /// Filter applied to every slot.
    pub filter: FilterEffect,
    /// Frame painted around the slots.
    pub frame: FrameStyle,
    /// Text encoded into the QR code; `None` draws no code.
    pub qr_payload: Option<String>,
    /// Label beneath the frame; empty draws no strip.
    pub label: String,
    /// Encoded output format.
    pub output: OutputFormat,
}

impl CompositionRequest {
    /// Creates a PNG request without QR code or label.
    pub fn new(cut_type: CutType, source_uris: Vec<String>, filter: FilterEffect, frame: FrameStyle) -> Self {
        Self {
            source_uris,
            cut_type,
            filter,
            frame,
            qr_payload: None,
            label: String::new(),
            output: OutputFormat::Png,
        }
    }

    /// Sets the QR payload.
    pub fn with_qr_payload(mut self, payload: impl Into<String>) -> Self {
        self.qr_payload = Some(payload.into());
        self
    }

    /// Sets the label text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the output format.
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Checks photo count, label length, QR payload and output settings.
    ///
    /// # Errors
    /// Returns [`CompositionError::PhotoCountMismatch`] or
    /// [`CompositionError::InvalidRequest`].
    pub fn validate(&self) -> Result<(), CompositionError> {
        let expected = self.cut_type.required_photo_count();
        if self.source_uris.len() != expected {
            return Err(CompositionError::PhotoCountMismatch {
                expected,
                actual: self.source_uris.len(),
            });
        }
        validate_label(&self.label)?;
        if let Some(payload) = &self.qr_payload
            && payload.trim().is_empty()
        {
            return Err(CompositionError::InvalidRequest("qr payload is empty".to_string()));
        }
        self.output.validate()
    }
}

/// Encoded composition result.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding used.
    pub format: OutputFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Where the QR code was drawn, if any.
    pub qr_placement: Option<QrPlacement>,
}

impl ComposedImage {
    /// MIME type of [`ComposedImage::bytes`].
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Renders composition requests.
#[derive(Clone)]
pub struct CompositionEngine {
    options: EngineOptions,
    source: Arc<dyn PhotoSource>,
    label: LabelRenderer,
}

impl std::fmt::Debug for CompositionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionEngine")
            .field("options", &self.options)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl CompositionEngine {
    /// Creates an engine that draws label strips without glyphs.
    pub fn new(options: EngineOptions, source: Arc<dyn PhotoSource>) -> Self {
        Self {
            options,
            source,
            label: LabelRenderer::without_font(),
        }
    }

    /// Uses the given font for label text.
    ///
    /// # Errors
    /// Returns [`CompositionError::Font`] for unparsable font data.
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Result<Self, CompositionError> {
        self.label = LabelRenderer::from_font_bytes(bytes)?;
        Ok(self)
    }

    /// Active options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Produces the final encoded image for `request`.
    ///
    /// The QR code is placed within the framed area above the label strip,
    /// so it never covers label glyphs. Without a label the framed area is
    /// the whole canvas.
    ///
    /// # Errors
    /// Returns [`CompositionError`] for invalid requests, unreadable photos,
    /// QR payloads that do not fit, and encoder failures.
    pub fn compose(&self, request: &CompositionRequest) -> Result<ComposedImage, CompositionError> {
        request.validate()?;

        let border = request.frame.style.border_width();
        let strip = if request.label.is_empty() {
            0
        } else {
            self.options.label_strip_height
        };
        let layout = CanvasLayout::compute(request.cut_type, self.options.slot_width, border, strip)?;
        log::info!(
            "composing {} canvas {}x{} (filter {}, frame {})",
            request.cut_type,
            layout.width,
            layout.height,
            request.filter.id,
            request.frame.id
        );

        let mut canvas = allocate(layout.width, layout.height)?;
        paint_frame(&mut canvas, layout.frame_height, &request.frame.style, self.source.as_ref());

        for (uri, slot) in request.source_uris.iter().zip(&layout.slots) {
            let photo = self.load_photo(uri)?;
            self.place_photo(&mut canvas, photo, *slot, &request.filter);
        }

        if strip > 0 {
            let background = request.frame.style.border_color().unwrap_or(Rgb::BLACK);
            self.label
                .render(&mut canvas, layout.frame_height, strip, background, &request.label);
        }

        let qr_placement = match &request.qr_payload {
            Some(payload) => Some(self.draw_qr(&mut canvas, layout.frame_height, payload)?),
            None => None,
        };

        let bytes = encode(canvas, request.output)?;
        log::info!(
            "composition finished: {} bytes, qr {:?}",
            bytes.len(),
            qr_placement
        );

        Ok(ComposedImage {
            bytes,
            format: request.output,
            width: layout.width,
            height: layout.height,
            qr_placement,
        })
    }

    /// Draws a QR code onto an already-encoded image and re-encodes it.
    ///
    /// Placement is computed from the image's own pixel dimensions.
    ///
    /// # Errors
    /// Returns [`CompositionError::DimensionsUnavailable`] when the image
    /// header cannot be read, plus QR and encoder failures.
    pub fn overlay_qr_on_encoded(
        &self,
        encoded: &[u8],
        payload: &str,
        output: OutputFormat,
    ) -> Result<ComposedImage, CompositionError> {
        output.validate()?;
        if payload.trim().is_empty() {
            return Err(CompositionError::InvalidRequest("qr payload is empty".to_string()));
        }

        let (width, height) = ImageReader::new(Cursor::new(encoded))
            .with_guessed_format()
            .map_err(|error| CompositionError::DimensionsUnavailable(error.to_string()))?
            .into_dimensions()
            .map_err(|error| CompositionError::DimensionsUnavailable(error.to_string()))?;
        if width == 0 || height == 0 {
            return Err(CompositionError::DimensionsUnavailable(format!(
                "image reports {width}x{height}"
            )));
        }

        let mut canvas = image::load_from_memory(encoded)
            .map_err(|error| CompositionError::Backend(error.to_string()))?
            .to_rgba8();
        let placement = self.draw_qr(&mut canvas, height, payload)?;
        let bytes = encode(canvas, output)?;

        Ok(ComposedImage {
            bytes,
            format: output,
            width,
            height,
            qr_placement: Some(placement),
        })
    }

    fn load_photo(&self, uri: &str) -> Result<RgbaImage, CompositionError> {
        let bytes = self
            .source
            .load(uri)
            .map_err(|error| CompositionError::SourceUnreadable {
                uri: uri.to_string(),
                reason: error.to_string(),
            })?;
        let photo = image::load_from_memory(&bytes)
            .map_err(|error| CompositionError::SourceUnreadable {
                uri: uri.to_string(),
                reason: error.to_string(),
            })?
            .to_rgba8();
        if photo.width() == 0 || photo.height() == 0 {
            return Err(CompositionError::DimensionsUnavailable(format!("{uri} has no pixels")));
        }
        Ok(photo)
    }

    fn place_photo(&self, canvas: &mut RgbaImage, photo: RgbaImage, slot: SlotRect, filter: &FilterEffect) {
        let (fit_width, fit_height) = contain(photo.width(), photo.height(), slot.width, slot.height);
        let mut fitted = if (fit_width, fit_height) == photo.dimensions() {
            photo
        } else {
            imageops::resize(&photo, fit_width, fit_height, imageops::FilterType::Lanczos3)
        };

        apply_adjustments(&mut fitted, &filter.transform);

        let x = slot.x + (slot.width - fit_width) / 2;
        let y = slot.y + (slot.height - fit_height) / 2;
        imageops::replace(canvas, &fitted, i64::from(x), i64::from(y));

        if let Some(overlay) = filter.transform.overlay {
            apply_overlay(canvas, slot, overlay);
        }
    }

    fn draw_qr(&self, canvas: &mut RgbaImage, area_height: u32, payload: &str) -> Result<QrPlacement, CompositionError> {
        let placement = place_qr(
            canvas.width(),
            area_height,
            self.options.qr_ratio,
            self.options.qr_anchor,
        )?;
        render_qr(canvas, payload, placement, self.options.qr_error_correction)?;
        Ok(placement)
    }
}

// Largest size with the source aspect that fits inside the slot.
fn contain(src_width: u32, src_height: u32, slot_width: u32, slot_height: u32) -> (u32, u32) {
    let scale = (slot_width as f64 / src_width as f64).min(slot_height as f64 / src_height as f64);
    let width = ((src_width as f64 * scale).round() as u32).clamp(1, slot_width);
    let height = ((src_height as f64 * scale).round() as u32).clamp(1, slot_height);
    (width, height)
}

fn allocate(width: u32, height: u32) -> Result<RgbaImage, CompositionError> {
    if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
        return Err(CompositionError::Backend(format!(
            "canvas {width}x{height} exceeds {MAX_CANVAS_PIXELS} pixels"
        )));
    }
    Ok(RgbaImage::new(width, height))
}

fn encode(canvas: RgbaImage, output: OutputFormat) -> Result<Vec<u8>, CompositionError> {
    let mut bytes = Vec::new();
    match output {
        OutputFormat::Png => DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|error| CompositionError::Backend(error.to_string()))?,
        OutputFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .encode_image(&rgb)
                .map_err(|error| CompositionError::Backend(error.to_string()))?;
        }
    }
    Ok(bytes)
}

/// Composition failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompositionError {
    /// Number of photos differs from what the cut type needs.
    #[error("expected {expected} photos, got {actual}")]
    PhotoCountMismatch {
        /// Required count.
        expected: usize,
        /// Supplied count.
        actual: usize,
    },
    /// Unknown cut type identifier.
    #[error("invalid cut type: {0}")]
    InvalidCutType(String),
    /// Image dimensions could not be determined.
    #[error("image dimensions unavailable: {0}")]
    DimensionsUnavailable(String),
    /// A photo could not be read or decoded.
    #[error("photo {uri} unreadable: {reason}")]
    SourceUnreadable {
        /// Photo URI.
        uri: String,
        /// Underlying failure.
        reason: String,
    },
    /// Request fields are inconsistent.
    #[error("invalid composition request: {0}")]
    InvalidRequest(String),
    /// The QR module grid does not fit the computed box.
    #[error("qr payload needs {modules} modules, too many for {size_px}px")]
    QrPayloadTooLarge {
        /// Modules per side without quiet zone.
        modules: u32,
        /// Available edge length.
        size_px: u32,
    },
    /// QR encoder rejected the payload.
    #[error("qr generation failed: {0}")]
    QrEncoding(String),
    /// Label font unusable.
    #[error("label font unusable: {0}")]
    Font(String),
    /// Rendering surface or encoder failure.
    #[error("composition backend failure: {0}")]
    Backend(String),
    /// Canvas geometry overflow.
    #[error("canvas dimension overflow")]
    Overflow,
}

impl CompositionError {
    /// Returns `true` for failures that only concern the QR overlay, where
    /// composing again without the code can still succeed.
    pub fn is_qr_stage(&self) -> bool {
        matches!(
            self,
            CompositionError::QrPayloadTooLarge { .. } | CompositionError::QrEncoding(_)
        )
    }
}

impl From<CoreError> for CompositionError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidCutType(raw) => CompositionError::InvalidCutType(raw),
            CoreError::InvalidDimensions { width, height } => {
                CompositionError::DimensionsUnavailable(format!("{width}x{height}"))
            }
            CoreError::Overflow => CompositionError::Overflow,
            other => CompositionError::InvalidRequest(other.to_string()),
        }
    }
}
