//! Output flows: compose with fallback, album save, print and share.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cutprint_api::{PhotoApi, UploadReport};
use cutprint_capture::CapturedPhoto;
use cutprint_compose::{ComposedImage, CompositionEngine, CompositionError, MemorySource, OutputFormat};
use cutprint_core::Visibility;
use cutprint_print::{
    Orientation, PrintDocument, PrintJob, PrintOutcome, PrintQr, PrintService, ShareOutcome, ShareRequest,
    ShareService, generate,
};
use cutprint_recovery::{ErrorKind, RecoveryAction, RecoveryDecision};

use crate::config::QrWithoutSave;
use crate::session::{EditingSession, QrGate};
use crate::{AppError, redact_sensitive};

/// Image handed to print, share or save.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalImage {
    /// Composition succeeded.
    Composed(ComposedImage),
    /// Composition failed; the first selected photo stands in.
    Original {
        /// URI of the unmodified photo.
        uri: String,
    },
}

impl FinalImage {
    /// URI collaborators can open. Composed bytes travel as a `data:` URI.
    pub fn uri(&self) -> String {
        match self {
            FinalImage::Composed(image) => format!("data:{};base64,{}", image.mime_type(), STANDARD.encode(&image.bytes)),
            FinalImage::Original { uri } => uri.clone(),
        }
    }

    /// MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FinalImage::Composed(image) => image.mime_type(),
            FinalImage::Original { uri } => mime_for_uri(uri),
        }
    }

    /// Returns `true` when a QR code is drawn into the image.
    pub fn has_qr(&self) -> bool {
        matches!(self, FinalImage::Composed(image) if image.qr_placement.is_some())
    }
}

/// Non-blocking notice shown next to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// QR was requested but the photo is not saved yet.
    QrOmittedUntilSaved,
    /// The QR code could not be drawn; the image was composed without it.
    QrDropped {
        /// Failure category.
        kind: ErrorKind,
        /// Redacted failure text.
        detail: String,
    },
    /// Composition failed and the original photo is used.
    CompositionFailed {
        /// Failure category.
        kind: ErrorKind,
        /// Redacted failure text.
        detail: String,
    },
}

/// Result ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct Finished {
    /// Image to output.
    pub image: FinalImage,
    /// Notices for the user.
    pub notices: Vec<Notice>,
}

/// Outcome of [`Booth::finish`].
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// Image is ready.
    Ready(Finished),
    /// QR requested before save under the prompt policy; nothing was composed.
    SaveRequired,
}

/// Outcome of a print or share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Collaborator finished.
    Completed,
    /// User dismissed the dialog.
    Cancelled,
    /// Collaborator failed; the decision says what to offer.
    Failed(RecoveryDecision),
}

/// Print attempt plus the share fallback, when one ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReport {
    /// Outcome of the print itself.
    pub print: FlowOutcome,
    /// Outcome of sharing the unmodified image, when the print failure
    /// offered it.
    pub fallback_share: Option<FlowOutcome>,
}

/// Wires the engine to the print, share and album collaborators.
#[derive(Clone)]
pub struct Booth {
    engine: CompositionEngine,
    printer: Arc<dyn PrintService>,
    sharer: Arc<dyn ShareService>,
    api: Option<PhotoApi>,
    qr_without_save: QrWithoutSave,
    output: OutputFormat,
    print_margin_mm: u32,
}

impl std::fmt::Debug for Booth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Booth")
            .field("engine", &self.engine)
            .field("api", &self.api)
            .field("qr_without_save", &self.qr_without_save)
            .field("output", &self.output)
            .field("print_margin_mm", &self.print_margin_mm)
            .finish_non_exhaustive()
    }
}

impl Booth {
    /// Creates a booth without album access.
    pub fn new(engine: CompositionEngine, printer: Arc<dyn PrintService>, sharer: Arc<dyn ShareService>) -> Self {
        Self {
            engine,
            printer,
            sharer,
            api: None,
            qr_without_save: QrWithoutSave::default(),
            output: OutputFormat::Png,
            print_margin_mm: 0,
        }
    }

    /// Enables album saves.
    pub fn with_api(mut self, api: PhotoApi) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the policy for QR requests that precede the save.
    pub fn with_qr_policy(mut self, policy: QrWithoutSave) -> Self {
        self.qr_without_save = policy;
        self
    }

    /// Sets the encoded output format.
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Sets the page margin of composed print documents.
    pub fn with_print_margin(mut self, margin_mm: u32) -> Self {
        self.print_margin_mm = margin_mm;
        self
    }

    /// Composes the session. When only the QR code cannot be drawn the image
    /// is composed again without it; any other failure falls back to the
    /// first original photo.
    pub fn finish(&self, session: &EditingSession) -> FinishOutcome {
        let gate = session.qr_gate(self.qr_without_save);
        let mut notices = Vec::new();
        match gate {
            QrGate::SaveRequired => {
                log::info!("qr requested before album save; prompting");
                return FinishOutcome::SaveRequired;
            }
            QrGate::Degraded => {
                log::info!("qr requested before album save; continuing without qr");
                notices.push(Notice::QrOmittedUntilSaved);
            }
            QrGate::NotRequested | QrGate::Ready(_) => {}
        }

        let request = session.composition_request(&gate, self.output);
        let image = match self.engine.compose(&request) {
            Ok(image) => FinalImage::Composed(image),
            Err(error) if error.is_qr_stage() => {
                let detail = redact_sensitive(&error.to_string());
                log::warn!("qr code could not be drawn, composing without it: {detail}");
                notices.push(Notice::QrDropped {
                    kind: ErrorKind::from(&error),
                    detail,
                });
                self.compose_without_qr(session)
                    .unwrap_or_else(|error| fall_back_to_original(session, &error, &mut notices))
            }
            Err(error) => fall_back_to_original(session, &error, &mut notices),
        };
        FinishOutcome::Ready(Finished { image, notices })
    }

    fn compose_without_qr(&self, session: &EditingSession) -> Result<FinalImage, CompositionError> {
        let request = session.composition_request(&QrGate::NotRequested, self.output);
        self.engine.compose(&request).map(FinalImage::Composed)
    }

    /// Saves a composed image to the album and records the URL on the
    /// session so a later [`Booth::finish`] can draw the QR code.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] without album access or for an
    /// uncomposed image, and [`AppError::Api`] when the upload fails.
    pub fn save_to_album(
        &self,
        session: &mut EditingSession,
        image: &FinalImage,
        visibility: Visibility,
        friend_ids: Option<Vec<i64>>,
    ) -> Result<UploadReport, AppError> {
        let api = self
            .api
            .as_ref()
            .ok_or_else(|| AppError::Session("album api is not configured".to_string()))?;
        let FinalImage::Composed(composed) = image else {
            return Err(AppError::Session("only composed images can be saved".to_string()));
        };
        let report = api.upload_base64(&composed.bytes, visibility, friend_ids)?;
        session.record_save(report.saved.clone());
        Ok(report)
    }

    /// Prints `image`. Images with a drawn QR code go through the HTML
    /// document; everything else is printed directly.
    pub fn print(&self, image: &FinalImage, title: &str, orientation: Orientation) -> FlowOutcome {
        let job = PrintJob {
            image_uri: image.uri(),
            title: title.to_string(),
            orientation,
            qr: if image.has_qr() { PrintQr::Composited } else { PrintQr::None },
            margin_mm: self.print_margin_mm,
        };
        let document = match generate(&job) {
            Ok(document) => document,
            Err(error) => {
                log::warn!("print document generation failed: {error}");
                return FlowOutcome::Failed(RecoveryDecision::for_kind(ErrorKind::from(&error)));
            }
        };
        log_document(&document);

        match self.printer.print(&document) {
            Ok(PrintOutcome::Completed) => FlowOutcome::Completed,
            Ok(PrintOutcome::Cancelled) => FlowOutcome::Cancelled,
            Err(error) => failed("print", ErrorKind::from(&error), &error.message),
        }
    }

    /// Prints and, when the failure calls for it, shares the unmodified
    /// image instead.
    pub fn print_with_fallback(
        &self,
        session: &EditingSession,
        image: &FinalImage,
        title: &str,
        orientation: Orientation,
    ) -> PrintReport {
        let print = self.print(image, title, orientation);
        let fallback_share = match &print {
            FlowOutcome::Failed(decision) if decision.action == RecoveryAction::OfferShareFallback => {
                Some(self.share_unmodified(session, image, title))
            }
            _ => None,
        };
        PrintReport { print, fallback_share }
    }

    /// Opens the share sheet for `image`.
    pub fn share(&self, image: &FinalImage, title: &str) -> FlowOutcome {
        let request = match ShareRequest::for_image(image.uri(), image.mime_type(), title) {
            Ok(request) => request,
            Err(error) => {
                log::warn!("share request rejected: {error}");
                return FlowOutcome::Failed(RecoveryDecision::for_kind(ErrorKind::from(&error)));
            }
        };
        match self.sharer.share(&request) {
            Ok(ShareOutcome::Shared) => FlowOutcome::Completed,
            Ok(ShareOutcome::Dismissed) => FlowOutcome::Cancelled,
            Err(error) => failed("share", ErrorKind::from(&error), &error.message),
        }
    }

    /// Shares `image` without its QR overlay.
    ///
    /// A composite carrying a QR code is composed again without it. The
    /// first original photo is shared only when that composition fails or
    /// `image` already is the original.
    pub fn share_unmodified(&self, session: &EditingSession, image: &FinalImage, title: &str) -> FlowOutcome {
        let unmodified = if image.has_qr() {
            self.compose_without_qr(session).unwrap_or_else(|error| {
                log::warn!(
                    "composition without qr failed, sharing original photo: {}",
                    redact_sensitive(&error.to_string())
                );
                original_photo(session)
            })
        } else {
            image.clone()
        };
        self.share(&unmodified, title)
    }
}

fn original_photo(session: &EditingSession) -> FinalImage {
    FinalImage::Original {
        uri: session.source_uris().first().cloned().unwrap_or_default(),
    }
}

fn fall_back_to_original(session: &EditingSession, error: &CompositionError, notices: &mut Vec<Notice>) -> FinalImage {
    let detail = redact_sensitive(&error.to_string());
    log::warn!("composition failed, using original photo: {detail}");
    notices.push(Notice::CompositionFailed {
        kind: ErrorKind::from(error),
        detail,
    });
    original_photo(session)
}

/// In-memory source holding the encoded bytes of captured shots.
pub fn memory_source_for(shots: &[CapturedPhoto]) -> MemorySource {
    shots.iter().fold(MemorySource::new(), |source, shot| {
        source.with(shot.uri.clone(), shot.bytes.clone())
    })
}

fn failed(operation: &str, kind: ErrorKind, message: &str) -> FlowOutcome {
    // A dismissed dialog is reported as an error by some platforms.
    if kind == ErrorKind::UserCancelled {
        log::info!("{operation} cancelled by user");
        return FlowOutcome::Cancelled;
    }
    log::warn!("{operation} failed ({kind:?}): {}", redact_sensitive(message));
    FlowOutcome::Failed(RecoveryDecision::for_kind(kind))
}

fn log_document(document: &PrintDocument) {
    let mode = match document {
        PrintDocument::Direct { .. } => "direct",
        PrintDocument::Composed { .. } => "composed",
    };
    log::info!(
        "printing {mode} document {} ({})",
        document.fingerprint(),
        document.orientation().as_str()
    );
}

fn mime_for_uri(uri: &str) -> &'static str {
    let lowered = uri.to_ascii_lowercase();
    if lowered.starts_with("data:image/jpeg") || lowered.ends_with(".jpg") || lowered.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "image/png"
    }
}
