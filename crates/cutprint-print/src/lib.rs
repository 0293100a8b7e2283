#![warn(missing_docs)]
//! # cutprint-print
//!
//! ## Purpose
//! Builds print-ready documents for a finished photo and defines the print
//! and share collaborators the app hands them to.
//!
//! ## Responsibilities
//! - Choose direct mode (original image, no QR) or composed mode (HTML page).
//! - Reuse an already-composited QR instead of drawing a second one.
//! - Position a separate QR inset from its [`QrPlacement`] when needed.
//! - Fingerprint documents so repeated generation can be compared.
//! - Describe share requests with MIME type and platform share hint.
//!
//! ## Data flow
//! [`PrintJob`] -> [`generate`] -> [`PrintDocument`] -> [`PrintService`]
//! -> [`PrintOutcome`] or [`CollaboratorError`] for the classifier.
//!
//! ## Ownership and lifetimes
//! Jobs and documents are owned values created per print action and dropped
//! once the dialog resolves.
//!
//! ## Error model
//! Invalid jobs fail with [`PrintError`]. Collaborators report failures as an
//! opaque [`CollaboratorError`] message because their vocabulary is not ours;
//! those messages are classified downstream.
//!
//! ## Example
//! ```rust
//! use cutprint_print::{Orientation, PrintDocument, PrintJob, PrintQr, generate};
//!
//! let job = PrintJob {
//!     image_uri: "file:///tmp/strip.png".to_string(),
//!     title: "Summer".to_string(),
//!     orientation: Orientation::Portrait,
//!     qr: PrintQr::None,
//!     margin_mm: 0,
//! };
//! let document = generate(&job)?;
//! assert!(matches!(document, PrintDocument::Direct { .. }));
//! # Ok::<(), cutprint_print::PrintError>(())
//! ```

use std::fmt::Write as _;

use cutprint_core::QrPlacement;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Page orientation. Selects page setup only; the image is never re-flowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Tall page.
    #[default]
    Portrait,
    /// Wide page.
    Landscape,
}

impl Orientation {
    /// CSS `@page` keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// How the QR code reaches the printed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PrintQr {
    /// No QR code requested.
    None,
    /// The image already contains the QR code.
    Composited,
    /// A separate QR image placed over the photo.
    Inset {
        /// URI of the QR image.
        qr_code_uri: String,
        /// Placement in the photo's pixel space.
        placement: QrPlacement,
        /// Photo width in pixels.
        image_width: u32,
        /// Photo height in pixels.
        image_height: u32,
    },
}

/// One print action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    /// Image to print.
    pub image_uri: String,
    /// Caption and document title.
    pub title: String,
    /// Page orientation.
    pub orientation: Orientation,
    /// QR handling.
    pub qr: PrintQr,
    /// Page margin in millimetres for composed documents; `0` is full bleed.
    #[serde(default)]
    pub margin_mm: u32,
}

/// Document handed to the print collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintDocument {
    /// Print the image as is with platform defaults.
    Direct {
        /// Image to print.
        image_uri: String,
        /// Page orientation.
        orientation: Orientation,
    },
    /// Print a generated HTML page.
    Composed {
        /// Full HTML document.
        html: String,
        /// Page orientation.
        orientation: Orientation,
    },
}

impl PrintDocument {
    /// Orientation of the page setup.
    pub fn orientation(&self) -> Orientation {
        match self {
            PrintDocument::Direct { orientation, .. } | PrintDocument::Composed { orientation, .. } => {
                *orientation
            }
        }
    }

    /// Hex SHA-256 over the mode, orientation and content.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            PrintDocument::Direct {
                image_uri,
                orientation,
            } => {
                hasher.update(b"direct\0");
                hasher.update(orientation.as_str().as_bytes());
                hasher.update(b"\0");
                hasher.update(image_uri.as_bytes());
            }
            PrintDocument::Composed { html, orientation } => {
                hasher.update(b"composed\0");
                hasher.update(orientation.as_str().as_bytes());
                hasher.update(b"\0");
                hasher.update(html.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Largest accepted page margin in millimetres.
pub const MAX_MARGIN_MM: u32 = 50;

/// Builds the document for `job`.
///
/// Output depends only on the job, so equal jobs give equal documents.
///
/// # Errors
/// Returns [`PrintError::InvalidJob`] for a blank image URI, a margin over
/// [`MAX_MARGIN_MM`], or an inset that does not fit the image.
pub fn generate(job: &PrintJob) -> Result<PrintDocument, PrintError> {
    if job.image_uri.trim().is_empty() {
        return Err(PrintError::InvalidJob("image uri is empty".to_string()));
    }
    if job.margin_mm > MAX_MARGIN_MM {
        return Err(PrintError::InvalidJob(format!(
            "margin {}mm exceeds {MAX_MARGIN_MM}mm",
            job.margin_mm
        )));
    }

    let document = match &job.qr {
        PrintQr::None => PrintDocument::Direct {
            image_uri: job.image_uri.clone(),
            orientation: job.orientation,
        },
        PrintQr::Composited => PrintDocument::Composed {
            html: render_html(job, None),
            orientation: job.orientation,
        },
        PrintQr::Inset {
            qr_code_uri,
            placement,
            image_width,
            image_height,
        } => {
            if qr_code_uri.trim().is_empty() {
                return Err(PrintError::InvalidJob("qr code uri is empty".to_string()));
            }
            if *image_width == 0 || *image_height == 0 || !placement.fits_within(*image_width, *image_height) {
                return Err(PrintError::InvalidJob(format!(
                    "qr inset {placement:?} does not fit {image_width}x{image_height}"
                )));
            }
            let inset = Inset {
                uri: qr_code_uri,
                left: percent(placement.x, *image_width),
                top: percent(placement.y, *image_height),
                width: percent(placement.size_px, *image_width),
            };
            PrintDocument::Composed {
                html: render_html(job, Some(inset)),
                orientation: job.orientation,
            }
        }
    };

    log::debug!(
        "print document for {:?} ({}) fingerprint {}",
        job.title,
        job.orientation.as_str(),
        document.fingerprint()
    );
    Ok(document)
}

struct Inset<'a> {
    uri: &'a str,
    left: String,
    top: String,
    width: String,
}

fn percent(value: u32, extent: u32) -> String {
    format!("{:.4}%", value as f64 * 100.0 / extent as f64)
}

fn css_length_mm(value: u32) -> String {
    if value == 0 { "0".to_string() } else { format!("{value}mm") }
}

fn render_html(job: &PrintJob, inset: Option<Inset<'_>>) -> String {
    let title = escape_html(&job.title);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("<style>\n");
    let _ = writeln!(
        html,
        "@page {{ size: A4 {}; margin: {}; }}",
        job.orientation.as_str(),
        css_length_mm(job.margin_mm)
    );
    html.push_str("html, body { margin: 0; padding: 0; }\n");
    html.push_str(".sheet { position: relative; width: 100%; }\n");
    html.push_str(".photo { display: block; width: 100%; height: auto; }\n");
    html.push_str(".qr { position: absolute; height: auto; }\n");
    html.push_str(".caption { text-align: center; font-family: sans-serif; font-size: 14pt; margin: 8px 0; }\n");
    html.push_str("</style>\n</head>\n<body>\n<div class=\"sheet\">\n");
    let _ = writeln!(
        html,
        "<img class=\"photo\" src=\"{}\" alt=\"{title}\">",
        escape_html(&job.image_uri)
    );
    if let Some(inset) = inset {
        let _ = writeln!(
            html,
            "<img class=\"qr\" src=\"{}\" alt=\"QR code\" style=\"left: {}; top: {}; width: {};\">",
            escape_html(inset.uri),
            inset.left,
            inset.top,
            inset.width
        );
    }
    html.push_str("</div>\n");
    if !job.title.trim().is_empty() {
        let _ = writeln!(html, "<p class=\"caption\">{title}</p>");
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Escapes text for HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Terminal state of a print dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The job was sent to the printer.
    Completed,
    /// The user dismissed the dialog.
    Cancelled,
}

/// Terminal state of a share sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// A share target accepted the image.
    Shared,
    /// The user dismissed the sheet.
    Dismissed,
}

/// Print dialog collaborator.
pub trait PrintService: Send + Sync {
    /// Presents `document` to the platform print dialog.
    ///
    /// # Errors
    /// Returns the platform's failure text as [`CollaboratorError`].
    fn print(&self, document: &PrintDocument) -> Result<PrintOutcome, CollaboratorError>;
}

/// Share sheet collaborator.
pub trait ShareService: Send + Sync {
    /// Presents the share sheet for `request`.
    ///
    /// # Errors
    /// Returns the platform's failure text as [`CollaboratorError`].
    fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, CollaboratorError>;
}

/// Image share request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Image URI.
    pub uri: String,
    /// MIME type of the image.
    pub mime_type: String,
    /// Uniform type identifier used by share sheets that need one.
    pub uti: String,
    /// Share sheet title.
    pub dialog_title: String,
}

impl ShareRequest {
    /// Builds a share request for a PNG or JPEG image.
    ///
    /// # Errors
    /// Returns [`PrintError::UnsupportedMime`] for other MIME types and
    /// [`PrintError::InvalidJob`] for a blank URI.
    pub fn for_image(uri: impl Into<String>, mime_type: &str, dialog_title: impl Into<String>) -> Result<Self, PrintError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(PrintError::InvalidJob("share uri is empty".to_string()));
        }
        let uti = match mime_type {
            "image/png" => "public.png",
            "image/jpeg" | "image/jpg" => "public.jpeg",
            other => return Err(PrintError::UnsupportedMime(other.to_string())),
        };
        Ok(Self {
            uri,
            mime_type: mime_type.to_string(),
            uti: uti.to_string(),
            dialog_title: dialog_title.into(),
        })
    }
}

/// Opaque failure reported by a print or share collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CollaboratorError {
    /// Platform error text.
    pub message: String,
}

impl CollaboratorError {
    /// Wraps platform error text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Document generation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrintError {
    /// Job fields are inconsistent.
    #[error("invalid print job: {0}")]
    InvalidJob(String),
    /// Share target cannot handle the MIME type.
    #[error("unsupported mime type: {0}")]
    UnsupportedMime(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for document generation.

    use super::*;

    fn job(qr: PrintQr) -> PrintJob {
        PrintJob {
            image_uri: "file:///tmp/strip.png".to_string(),
            title: "Tom & Jerry's <night>".to_string(),
            orientation: Orientation::Landscape,
            qr,
            margin_mm: 0,
        }
    }

    #[test]
    fn no_qr_prints_the_original_directly() {
        let document = generate(&job(PrintQr::None)).expect("valid job");
        assert_eq!(
            document,
            PrintDocument::Direct {
                image_uri: "file:///tmp/strip.png".to_string(),
                orientation: Orientation::Landscape,
            }
        );
    }

    #[test]
    fn composited_qr_is_not_drawn_twice() {
        let PrintDocument::Composed { html, .. } = generate(&job(PrintQr::Composited)).expect("valid job") else {
            panic!("composed mode expected");
        };
        assert!(!html.contains("class=\"qr\""));
        assert!(html.contains("size: A4 landscape"));
        assert!(html.contains("Tom &amp; Jerry&#39;s &lt;night&gt;"));
    }

    #[test]
    fn margin_reaches_page_setup() {
        let full_bleed = generate(&job(PrintQr::Composited)).expect("valid job");
        let margined = generate(&PrintJob {
            margin_mm: 12,
            ..job(PrintQr::Composited)
        })
        .expect("valid job");

        let (PrintDocument::Composed { html: bleed, .. }, PrintDocument::Composed { html, .. }) = (&full_bleed, &margined)
        else {
            panic!("composed mode expected");
        };
        assert!(bleed.contains("@page { size: A4 landscape; margin: 0; }"));
        assert!(html.contains("@page { size: A4 landscape; margin: 12mm; }"));
        assert_ne!(full_bleed.fingerprint(), margined.fingerprint());

        let error = generate(&PrintJob {
            margin_mm: MAX_MARGIN_MM + 1,
            ..job(PrintQr::Composited)
        })
        .expect_err("margin too wide");
        assert!(matches!(error, PrintError::InvalidJob(_)));
    }

    #[test]
    fn inset_outside_image_is_rejected() {
        let error = generate(&job(PrintQr::Inset {
            qr_code_uri: "file:///tmp/qr.png".to_string(),
            placement: QrPlacement { x: 950, y: 10, size_px: 80 },
            image_width: 1000,
            image_height: 800,
        }))
        .expect_err("inset overflows");
        assert!(matches!(error, PrintError::InvalidJob(_)));
    }

    #[test]
    fn share_request_maps_mime_to_uti() {
        let request = ShareRequest::for_image("file:///tmp/a.jpg", "image/jpeg", "Share").expect("jpeg");
        assert_eq!(request.uti, "public.jpeg");
        assert!(matches!(
            ShareRequest::for_image("file:///tmp/a.gif", "image/gif", "Share"),
            Err(PrintError::UnsupportedMime(_))
        ));
    }
}
