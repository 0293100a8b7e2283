//! Photo byte sources addressed by URI.

use std::collections::HashMap;
use std::io::ErrorKind;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use url::Url;

/// Resolves a photo URI into encoded image bytes.
pub trait PhotoSource: Send + Sync {
    /// Loads the encoded bytes behind `uri`.
    ///
    /// # Errors
    /// Returns [`SourceError`] when the URI is unsupported or unreadable.
    fn load(&self, uri: &str) -> Result<Vec<u8>, SourceError>;
}

/// Reads plain paths, `file://` URIs and base64 `data:` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSource;

impl PhotoSource for FileSystemSource {
    fn load(&self, uri: &str) -> Result<Vec<u8>, SourceError> {
        if let Some(rest) = uri.strip_prefix("data:") {
            return decode_data_uri(uri, rest);
        }

        let path = if uri.starts_with("file://") {
            Url::parse(uri)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| SourceError::MalformedUri(uri.to_string()))?
        } else if let Some((scheme, _)) = uri.split_once("://") {
            return Err(SourceError::UnsupportedScheme(scheme.to_string()));
        } else {
            uri.into()
        };

        std::fs::read(&path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => SourceError::NotFound(uri.to_string()),
            ErrorKind::PermissionDenied => SourceError::PermissionDenied(uri.to_string()),
            _ => SourceError::Io {
                uri: uri.to_string(),
                reason: error.to_string(),
            },
        })
    }
}

fn decode_data_uri(uri: &str, rest: &str) -> Result<Vec<u8>, SourceError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SourceError::MalformedUri(truncate(uri)))?;
    if !header.ends_with(";base64") {
        return Err(SourceError::MalformedUri(truncate(uri)));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|_| SourceError::MalformedUri(truncate(uri)))
}

// Data URIs can be megabytes long; errors keep only the header.
fn truncate(uri: &str) -> String {
    uri.chars().take(48).collect()
}

/// In-memory source keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` under `uri`, replacing any previous entry.
    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(uri.into(), bytes);
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with(mut self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }
}

impl PhotoSource for MemorySource {
    fn load(&self, uri: &str) -> Result<Vec<u8>, SourceError> {
        self.entries
            .get(uri)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(uri.to_string()))
    }
}

/// Photo loading errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing exists at the URI.
    #[error("file not found: {0}")]
    NotFound(String),
    /// The OS refused access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The URI scheme is not handled by this source.
    #[error("unsupported uri scheme: {0}")]
    UnsupportedScheme(String),
    /// The URI could not be parsed.
    #[error("malformed uri: {0}")]
    MalformedUri(String),
    /// Other I/O failure.
    #[error("file read failed for {uri}: {reason}")]
    Io {
        /// URI being read.
        uri: String,
        /// OS error text.
        reason: String,
    },
}
