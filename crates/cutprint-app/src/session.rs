//! Editing session state between photo selection and output.

use cutprint_catalog::{DEFAULT_FILTER_ID, DEFAULT_FRAME_ID, FilterEffect, FrameStyle, StyleCatalog};
use cutprint_compose::{CompositionRequest, OutputFormat};
use cutprint_core::{CutType, SavedPhoto, validate_label};

use crate::AppError;
use crate::config::QrWithoutSave;

/// Whether a QR code can be drawn right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrGate {
    /// QR not requested.
    NotRequested,
    /// The album save finished; encode this URL.
    Ready(String),
    /// Continue without the QR code.
    Degraded,
    /// The user must save before a QR output is produced.
    SaveRequired,
}

/// User choices for one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingSession {
    cut_type: CutType,
    source_uris: Vec<String>,
    filter: FilterEffect,
    frame: FrameStyle,
    label: String,
    qr_requested: bool,
    saved: Option<SavedPhoto>,
}

impl EditingSession {
    /// Starts a session with the default filter and frame.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] when the photo count does not match the
    /// cut type and [`AppError::Catalog`] when a default style is missing.
    pub fn new(cut_type: CutType, source_uris: Vec<String>, catalog: &StyleCatalog) -> Result<Self, AppError> {
        let expected = cut_type.required_photo_count();
        if source_uris.len() != expected {
            return Err(AppError::Session(format!(
                "{cut_type} needs {expected} photos, got {}",
                source_uris.len()
            )));
        }
        Ok(Self {
            cut_type,
            source_uris,
            filter: catalog.require_filter(DEFAULT_FILTER_ID)?.clone(),
            frame: catalog.require_frame(DEFAULT_FRAME_ID)?.clone(),
            label: String::new(),
            qr_requested: false,
            saved: None,
        })
    }

    /// Layout of this session.
    pub fn cut_type(&self) -> CutType {
        self.cut_type
    }

    /// Photo URIs in slot order.
    pub fn source_uris(&self) -> &[String] {
        &self.source_uris
    }

    /// Selected filter.
    pub fn filter(&self) -> &FilterEffect {
        &self.filter
    }

    /// Selected frame.
    pub fn frame(&self) -> &FrameStyle {
        &self.frame
    }

    /// Label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Album save result, once recorded.
    pub fn saved(&self) -> Option<&SavedPhoto> {
        self.saved.as_ref()
    }

    /// Selects a filter by id. A different filter discards the recorded
    /// album save.
    ///
    /// # Errors
    /// Returns [`AppError::Catalog`] for unknown ids.
    pub fn select_filter(&mut self, catalog: &StyleCatalog, id: &str) -> Result<(), AppError> {
        let filter = catalog.require_filter(id)?;
        if *filter != self.filter {
            self.filter = filter.clone();
            self.discard_save("filter");
        }
        Ok(())
    }

    /// Selects a frame by id. A different frame discards the recorded album
    /// save.
    ///
    /// # Errors
    /// Returns [`AppError::Catalog`] for unknown ids.
    pub fn select_frame(&mut self, catalog: &StyleCatalog, id: &str) -> Result<(), AppError> {
        let frame = catalog.require_frame(id)?;
        if *frame != self.frame {
            self.frame = frame.clone();
            self.discard_save("frame");
        }
        Ok(())
    }

    /// Sets the label drawn beneath the frame. A different label discards
    /// the recorded album save.
    ///
    /// # Errors
    /// Returns [`AppError::Core`] for labels over the length limit.
    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), AppError> {
        let label = label.into();
        validate_label(&label)?;
        if label != self.label {
            self.label = label;
            self.discard_save("label");
        }
        Ok(())
    }

    // The saved photo no longer matches what would be composed, so its URL
    // must not be encoded until the next save.
    fn discard_save(&mut self, changed: &str) {
        if let Some(saved) = self.saved.take() {
            log::info!("{changed} changed after save of photo {}; qr payload withdrawn", saved.id);
        }
    }

    /// Asks for a QR code linking to the saved photo.
    pub fn request_qr(&mut self, requested: bool) {
        self.qr_requested = requested;
    }

    /// Records the album save; its URL becomes the QR payload.
    pub fn record_save(&mut self, saved: SavedPhoto) {
        log::info!("photo {} saved; qr payload available", saved.id);
        self.saved = Some(saved);
    }

    /// Resolves the QR state under `policy`.
    pub fn qr_gate(&self, policy: QrWithoutSave) -> QrGate {
        if !self.qr_requested {
            return QrGate::NotRequested;
        }
        match &self.saved {
            Some(saved) if !saved.url.trim().is_empty() => QrGate::Ready(saved.url.clone()),
            _ => match policy {
                QrWithoutSave::Degrade => QrGate::Degraded,
                QrWithoutSave::Prompt => QrGate::SaveRequired,
            },
        }
    }

    /// Builds the composition request, with a QR payload only when `gate`
    /// is [`QrGate::Ready`].
    pub fn composition_request(&self, gate: &QrGate, output: OutputFormat) -> CompositionRequest {
        let request = CompositionRequest::new(
            self.cut_type,
            self.source_uris.clone(),
            self.filter.clone(),
            self.frame.clone(),
        )
        .with_label(self.label.clone())
        .with_output(output);
        match gate {
            QrGate::Ready(url) => request.with_qr_payload(url.clone()),
            _ => request,
        }
    }
}
