#![warn(missing_docs)]
//! # cutprint-recovery
//!
//! ## Purpose
//! Maps failures from composition, printing, sharing and the REST boundary to
//! one of a small closed set of recovery actions.
//!
//! ## Responsibilities
//! - Classify opaque collaborator error text by case-insensitive substrings.
//! - Classify typed errors from our own crates without looking at text.
//! - Map every [`ErrorKind`] to exactly one [`RecoveryAction`].
//! - Provide the user-facing message for each kind.
//!
//! ## Data flow
//! Error -> [`ErrorKind`] -> [`recovery_action`] -> [`RecoveryDecision`] ->
//! app decides between silence, share fallback, retry or stop.
//!
//! ## Ownership and lifetimes
//! Everything here is a pure function over borrowed inputs; decisions are
//! small owned values.
//!
//! ## Error model
//! Classification is total: unmatched text becomes [`ErrorKind::Unknown`].
//!
//! ## Example
//! ```rust
//! use cutprint_recovery::{ErrorKind, RecoveryAction, classify, recovery_action};
//!
//! let kind = classify("Printing did not complete");
//! assert_eq!(kind, ErrorKind::UserCancelled);
//! assert_eq!(recovery_action(kind), RecoveryAction::Silent);
//! ```

use cutprint_api::ApiError;
use cutprint_compose::{CompositionError, SourceError};
use cutprint_print::{CollaboratorError, PrintError};
use serde::Serialize;

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The user dismissed a dialog; not an error.
    UserCancelled,
    /// Platform security policy blocked the operation.
    SecurityPolicy,
    /// No printer reachable.
    PrinterUnavailable,
    /// Ran out of memory or rendering resources.
    OutOfMemory,
    /// Network unreachable or timed out.
    NetworkUnavailable,
    /// Source file missing or unreadable.
    FileError,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::UserCancelled,
        ErrorKind::SecurityPolicy,
        ErrorKind::PrinterUnavailable,
        ErrorKind::OutOfMemory,
        ErrorKind::NetworkUnavailable,
        ErrorKind::FileError,
        ErrorKind::Unknown,
    ];
}

/// What the app does after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Show nothing.
    Silent,
    /// Offer sharing the unmodified image instead.
    OfferShareFallback,
    /// Offer repeating the same operation.
    OfferRetry,
    /// Explain the problem and stop.
    Terminal,
}

/// Classification result with its action and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryDecision {
    /// Failure category.
    pub kind: ErrorKind,
    /// Action to take.
    pub action: RecoveryAction,
    /// Message for the user; `None` for silent outcomes.
    pub message: Option<&'static str>,
}

impl RecoveryDecision {
    /// Decision for `kind`.
    pub fn for_kind(kind: ErrorKind) -> Self {
        let action = recovery_action(kind);
        Self {
            kind,
            action,
            message: (action != RecoveryAction::Silent).then(|| user_message(kind)),
        }
    }
}

// Checked in order; the first kind with a matching needle wins.
const RULES: &[(ErrorKind, &[&str])] = &[
    (
        ErrorKind::UserCancelled,
        &["cancel", "did not complete", "dismissed", "aborted by user"],
    ),
    (
        ErrorKind::SecurityPolicy,
        &["security", "permission", "not allowed", "denied", "forbidden", "unauthorized", "sandbox"],
    ),
    (
        ErrorKind::PrinterUnavailable,
        &["printer", "print service", "airprint", "spooler"],
    ),
    (
        ErrorKind::OutOfMemory,
        &["out of memory", "memory", "allocation failed", "too large"],
    ),
    (
        ErrorKind::NetworkUnavailable,
        &["network", "offline", "internet", "connection", "timed out", "timeout", "unreachable", "dns"],
    ),
    (
        ErrorKind::FileError,
        &["file", "not found", "no such", "does not exist", "enoent", "unreadable"],
    ),
];

/// Classifies opaque error text from an external collaborator.
pub fn classify(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    let kind = RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ErrorKind::Unknown);
    log::debug!("classified failure as {kind:?}");
    kind
}

/// Recovery action for `kind`.
pub fn recovery_action(kind: ErrorKind) -> RecoveryAction {
    match kind {
        ErrorKind::UserCancelled => RecoveryAction::Silent,
        ErrorKind::SecurityPolicy | ErrorKind::OutOfMemory => RecoveryAction::OfferShareFallback,
        ErrorKind::PrinterUnavailable | ErrorKind::NetworkUnavailable => RecoveryAction::OfferRetry,
        ErrorKind::FileError => RecoveryAction::Terminal,
        ErrorKind::Unknown => RecoveryAction::OfferRetry,
    }
}

/// User-facing message for `kind`.
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UserCancelled => "Cancelled.",
        ErrorKind::SecurityPolicy => "This device blocked printing. You can share the photo instead.",
        ErrorKind::PrinterUnavailable => "No printer is available. Check the printer and try again.",
        ErrorKind::OutOfMemory => "Not enough memory to prepare the print. You can share the photo instead.",
        ErrorKind::NetworkUnavailable => "The network is unavailable. Try again when you are back online.",
        ErrorKind::FileError => "The photo file could not be read.",
        ErrorKind::Unknown => "Something went wrong. Please try again.",
    }
}

/// Classifies collaborator text and builds the decision in one step.
pub fn decide(message: &str) -> RecoveryDecision {
    let decision = RecoveryDecision::for_kind(classify(message));
    log::info!("recovery decision {:?} -> {:?}", decision.kind, decision.action);
    decision
}

impl From<&CollaboratorError> for ErrorKind {
    fn from(error: &CollaboratorError) -> Self {
        classify(&error.message)
    }
}

impl From<&SourceError> for ErrorKind {
    fn from(error: &SourceError) -> Self {
        match error {
            SourceError::PermissionDenied(_) => ErrorKind::SecurityPolicy,
            SourceError::NotFound(_)
            | SourceError::UnsupportedScheme(_)
            | SourceError::MalformedUri(_)
            | SourceError::Io { .. } => ErrorKind::FileError,
        }
    }
}

impl From<&CompositionError> for ErrorKind {
    fn from(error: &CompositionError) -> Self {
        match error {
            CompositionError::SourceUnreadable { .. } | CompositionError::DimensionsUnavailable(_) => {
                ErrorKind::FileError
            }
            CompositionError::Backend(_) | CompositionError::Overflow => ErrorKind::OutOfMemory,
            CompositionError::PhotoCountMismatch { .. }
            | CompositionError::InvalidCutType(_)
            | CompositionError::InvalidRequest(_)
            | CompositionError::QrPayloadTooLarge { .. }
            | CompositionError::QrEncoding(_)
            | CompositionError::Font(_) => ErrorKind::Unknown,
        }
    }
}

impl From<&ApiError> for ErrorKind {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Transport(_) | ApiError::Timeout | ApiError::RateLimited | ApiError::Server(_) => {
                ErrorKind::NetworkUnavailable
            }
            ApiError::Unauthorized(_) => ErrorKind::SecurityPolicy,
            ApiError::InvalidEndpoint(_)
            | ApiError::InvalidRequest(_)
            | ApiError::Client(_)
            | ApiError::Decode(_)
            | ApiError::InvalidResponse(_) => ErrorKind::Unknown,
        }
    }
}

impl From<&PrintError> for ErrorKind {
    fn from(_: &PrintError) -> Self {
        ErrorKind::Unknown
    }
}
