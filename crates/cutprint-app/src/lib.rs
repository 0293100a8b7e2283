#![warn(missing_docs)]
//! # cutprint-app
//!
//! ## Purpose
//! Orchestrates the booth: editing session, composition, album save, print
//! and share, with every failure routed through the recovery policy.
//!
//! ## Responsibilities
//! - Read runtime configuration from `CUTPRINT_*` variables.
//! - Hold editing choices and enforce that QR codes only encode the URL of a
//!   saved photo.
//! - Drop the QR code when only the code cannot be drawn, and fall back to
//!   the original photo when composition itself fails.
//! - Withdraw the QR payload when the styling changes after an album save.
//! - Turn print and share failures into recovery decisions.
//! - Redact credentials from error text before it is logged.
//!
//! ## Data flow
//! Capture/selection -> [`EditingSession`] -> [`Booth::finish`] ->
//! optional [`Booth::save_to_album`] (QR payload) -> [`Booth::finish`] again
//! -> [`Booth::print`] / [`Booth::share`] -> [`FlowOutcome`].
//!
//! ## Ownership and lifetimes
//! Sessions own their URIs and style choices; each flow builds its own
//! request, job or share request and drops it when the call returns.
//!
//! ## Error model
//! Setup failures are wrapped in [`AppError`]. Composition, print and share
//! failures never surface as errors: they degrade to a composite without QR,
//! the original photo or a
//! [`RecoveryDecision`](cutprint_recovery::RecoveryDecision).
//!
//! ## Security and privacy notes
//! - API tokens are never printed by `Debug` output.
//! - Collaborator error text passes through [`redact_sensitive`] before it is
//!   logged.

mod booth;
mod config;
mod session;

use cutprint_api::ApiError;
use cutprint_capture::CaptureError;
use cutprint_catalog::CatalogError;
use cutprint_compose::CompositionError;
use cutprint_core::CoreError;
use cutprint_print::PrintError;
use cutprint_recovery::ErrorKind;
use thiserror::Error;

pub use booth::{
    Booth, FinalImage, FinishOutcome, Finished, FlowOutcome, Notice, PrintReport, memory_source_for,
};
pub use config::{AppConfig, ConfigError, DEFAULT_JPEG_QUALITY, QrWithoutSave};
pub use session::{EditingSession, QrGate};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("CUTPRINT_VERSION");

const REDACTED: &str = "<redacted>";

// Keys whose value is a credential. `bearer` is matched on its own so bare
// `Bearer <token>` strings are caught too.
const SENSITIVE_KEYS: [&str; 5] = ["authorization", "password", "secret", "bearer", "token"];

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Replaces credential values in `input` with `<redacted>`.
///
/// A value is the run of characters after a sensitive key and its separator
/// (`=`, `:`, quotes), up to whitespace, a quote, `,`, `;` or `&`. A leading
/// `Bearer ` scheme is kept.
pub fn redact_sensitive(input: &str) -> String {
    let lowered = input.to_ascii_lowercase();
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    while let Some((start, end)) = next_secret(lowered.as_bytes(), cursor) {
        output.push_str(&input[cursor..start]);
        output.push_str(REDACTED);
        cursor = end;
    }
    output.push_str(&input[cursor..]);
    output
}

// Byte offsets are safe to slice with: every delimiter is ASCII.
fn next_secret(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..bytes.len()).find_map(|position| {
        SENSITIVE_KEYS
            .iter()
            .filter(|key| bytes[position..].starts_with(key.as_bytes()))
            .find_map(|key| secret_value(bytes, position + key.len(), *key == "bearer"))
    })
}

fn secret_value(bytes: &[u8], after_key: usize, space_separates: bool) -> Option<(usize, usize)> {
    let mut start = after_key;
    while start < bytes.len() && matches!(bytes[start], b'=' | b':' | b'"' | b'\'' | b' ') {
        start += 1;
    }
    let separator = &bytes[after_key..start];
    let has_separator = separator.iter().any(|byte| *byte != b' ') || (space_separates && !separator.is_empty());
    if !has_separator {
        return None;
    }
    if bytes[start..].starts_with(b"bearer ") {
        start += "bearer ".len();
        while start < bytes.len() && bytes[start] == b' ' {
            start += 1;
        }
    }
    let end = bytes[start..]
        .iter()
        .position(|byte| byte.is_ascii_whitespace() || matches!(byte, b'"' | b'\'' | b',' | b';' | b'&'))
        .map_or(bytes.len(), |offset| start + offset);
    (end > start).then_some((start, end))
}

/// App-level orchestration errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Shared model validation failed.
    #[error("validation error: {0}")]
    Core(#[from] CoreError),
    /// Style catalog lookup or load failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Capture stage failed.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
    /// Composition failed where no fallback applies.
    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),
    /// Print document or share request could not be built.
    #[error("print error: {0}")]
    Print(#[from] PrintError),
    /// Backend API failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    /// Session is not in a state that allows the operation.
    #[error("session error: {0}")]
    Session(String),
    /// Local file could not be read or written.
    #[error("io error: {0}")]
    Io(String),
}

impl AppError {
    /// Recovery category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Composition(error) => ErrorKind::from(error),
            AppError::Print(error) => ErrorKind::from(error),
            AppError::Api(error) => ErrorKind::from(error),
            AppError::Io(_) => ErrorKind::FileError,
            AppError::Config(_)
            | AppError::Core(_)
            | AppError::Catalog(_)
            | AppError::Capture(_)
            | AppError::Session(_) => ErrorKind::Unknown,
        }
    }
}
