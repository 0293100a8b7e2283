//! Environment-driven runtime configuration.

use std::path::PathBuf;

use cutprint_api::{DEFAULT_API_BASE, RetryPolicy, validate_api_base};
use cutprint_compose::{
    DEFAULT_LABEL_STRIP_HEIGHT, DEFAULT_SLOT_WIDTH, EngineOptions, MIN_JPEG_QUALITY, OutputFormat,
    QrErrorCorrection,
};
use cutprint_core::{DEFAULT_QR_RATIO, QrAnchor};
use cutprint_print::MAX_MARGIN_MM;
use thiserror::Error;

/// JPEG quality used when only the format is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Behaviour when a QR code is requested before the photo is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrWithoutSave {
    /// Continue without the QR code and tell the user.
    #[default]
    Degrade,
    /// Stop and ask the user to save first.
    Prompt,
}

/// Runtime settings read from `CUTPRINT_*` environment variables.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    /// HTTPS base URL of the photo API.
    pub api_base: String,
    /// Bearer token from the login collaborator.
    pub api_token: Option<String>,
    /// Width of one photo slot in pixels.
    pub slot_width: u32,
    /// Height of the label strip in pixels.
    pub label_strip_height: u32,
    /// TTF font used for label glyphs.
    pub label_font: Option<PathBuf>,
    /// Encoded output format.
    pub output: OutputFormat,
    /// QR corner.
    pub qr_anchor: QrAnchor,
    /// QR edge as a share of the shorter canvas side.
    pub qr_ratio: f64,
    /// QR error correction level.
    pub qr_error_correction: QrErrorCorrection,
    /// Policy for QR requests that precede the album save.
    pub qr_without_save: QrWithoutSave,
    /// Upload retry budget.
    pub upload_max_retries: u32,
    /// Page margin of composed print documents in millimetres.
    pub print_margin_mm: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base", &self.api_base)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("slot_width", &self.slot_width)
            .field("label_strip_height", &self.label_strip_height)
            .field("label_font", &self.label_font)
            .field("output", &self.output)
            .field("qr_anchor", &self.qr_anchor)
            .field("qr_ratio", &self.qr_ratio)
            .field("qr_error_correction", &self.qr_error_correction)
            .field("qr_without_save", &self.qr_without_save)
            .field("upload_max_retries", &self.upload_max_retries)
            .field("print_margin_mm", &self.print_margin_mm)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            slot_width: DEFAULT_SLOT_WIDTH,
            label_strip_height: DEFAULT_LABEL_STRIP_HEIGHT,
            label_font: None,
            output: OutputFormat::Png,
            qr_anchor: QrAnchor::default(),
            qr_ratio: DEFAULT_QR_RATIO,
            qr_error_correction: QrErrorCorrection::default(),
            qr_without_save: QrWithoutSave::default(),
            upload_max_retries: RetryPolicy::default().max_retries,
            print_margin_mm: 0,
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for the first malformed variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; unset or blank keys keep defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for the first malformed variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(base) = get("CUTPRINT_API_BASE") {
            validate_api_base(&base).map_err(|_| ConfigError::invalid("CUTPRINT_API_BASE", &base))?;
            config.api_base = base;
        }
        config.api_token = get("CUTPRINT_API_TOKEN");

        if let Some(raw) = get("CUTPRINT_SLOT_WIDTH") {
            config.slot_width = parse_positive("CUTPRINT_SLOT_WIDTH", &raw)?;
        }
        if let Some(raw) = get("CUTPRINT_LABEL_STRIP_HEIGHT") {
            config.label_strip_height = parse_positive("CUTPRINT_LABEL_STRIP_HEIGHT", &raw)?;
        }
        config.label_font = get("CUTPRINT_LABEL_FONT").map(PathBuf::from);

        let quality = match get("CUTPRINT_JPEG_QUALITY") {
            Some(raw) => raw
                .parse::<u8>()
                .ok()
                .filter(|quality| (MIN_JPEG_QUALITY..=100).contains(quality))
                .ok_or_else(|| ConfigError::invalid("CUTPRINT_JPEG_QUALITY", &raw))?,
            None => DEFAULT_JPEG_QUALITY,
        };
        if let Some(raw) = get("CUTPRINT_OUTPUT_FORMAT") {
            config.output = match raw.to_ascii_lowercase().as_str() {
                "png" => OutputFormat::Png,
                "jpeg" | "jpg" => OutputFormat::Jpeg { quality },
                _ => return Err(ConfigError::invalid("CUTPRINT_OUTPUT_FORMAT", &raw)),
            };
        }

        if let Some(raw) = get("CUTPRINT_QR_ANCHOR") {
            config.qr_anchor = raw
                .parse()
                .map_err(|_| ConfigError::invalid("CUTPRINT_QR_ANCHOR", &raw))?;
        }
        if let Some(raw) = get("CUTPRINT_QR_RATIO") {
            config.qr_ratio = raw
                .parse::<f64>()
                .ok()
                .filter(|ratio| ratio.is_finite() && *ratio > 0.0 && *ratio <= 1.0)
                .ok_or_else(|| ConfigError::invalid("CUTPRINT_QR_RATIO", &raw))?;
        }
        if let Some(raw) = get("CUTPRINT_QR_ERROR_CORRECTION") {
            config.qr_error_correction = match raw.to_ascii_lowercase().as_str() {
                "m" | "medium" => QrErrorCorrection::Medium,
                "q" | "quartile" => QrErrorCorrection::Quartile,
                "h" | "high" => QrErrorCorrection::High,
                _ => return Err(ConfigError::invalid("CUTPRINT_QR_ERROR_CORRECTION", &raw)),
            };
        }
        if let Some(raw) = get("CUTPRINT_QR_WITHOUT_SAVE") {
            config.qr_without_save = match raw.to_ascii_lowercase().as_str() {
                "degrade" => QrWithoutSave::Degrade,
                "prompt" => QrWithoutSave::Prompt,
                _ => return Err(ConfigError::invalid("CUTPRINT_QR_WITHOUT_SAVE", &raw)),
            };
        }
        if let Some(raw) = get("CUTPRINT_UPLOAD_MAX_RETRIES") {
            config.upload_max_retries = raw
                .parse()
                .map_err(|_| ConfigError::invalid("CUTPRINT_UPLOAD_MAX_RETRIES", &raw))?;
        }
        if let Some(raw) = get("CUTPRINT_PRINT_MARGIN_MM") {
            config.print_margin_mm = raw
                .parse::<u32>()
                .ok()
                .filter(|margin| *margin <= MAX_MARGIN_MM)
                .ok_or_else(|| ConfigError::invalid("CUTPRINT_PRINT_MARGIN_MM", &raw))?;
        }

        Ok(config)
    }

    /// Composition engine options derived from this config.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            slot_width: self.slot_width,
            label_strip_height: self.label_strip_height,
            qr_ratio: self.qr_ratio,
            qr_anchor: self.qr_anchor,
            qr_error_correction: self.qr_error_correction,
        }
    }

    /// Upload retry policy with the configured budget.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.upload_max_retries,
            ..RetryPolicy::default()
        }
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::invalid(key, raw))
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set to an unusable value.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}
