//! Frame style definitions.
//!
//! Each frame kind carries only the fields it renders with, so a gradient
//! frame without colour stops cannot be represented.

use cutprint_core::Rgb;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

const MAX_BORDER_WIDTH: u32 = 400;

/// Tab grouping for frames. Declaration order is the UI tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameCategory {
    /// Plain borders.
    Basic,
    /// Flat colour borders.
    Color,
    /// Colour gradients.
    Gradient,
    /// Repeating patterns.
    Pattern,
    /// Procedural textures.
    Texture,
    /// Bitmap backgrounds.
    Custom,
}

/// Axis a gradient runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Top-left to bottom-right.
    Diagonal,
    /// Centre outward. Rendered as diagonal.
    Radial,
}

/// Repeating pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Round dots on a grid.
    Dots,
    /// Diagonal stripes.
    Stripes,
    /// Alternating squares.
    Checker,
}

/// Procedural texture kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    /// Fine paper grain.
    Paper,
    /// Film strip with sprocket holes along the sides.
    Film,
    /// Woven cross-hatch.
    Linen,
}

/// Rendering parameters of a frame, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FrameKind {
    /// Flat border.
    Solid {
        /// Border and gap width in pixels.
        border_width: u32,
        /// Border colour.
        border_color: Rgb,
    },
    /// Linear blend across colour stops.
    Gradient {
        /// Border and gap width in pixels.
        border_width: u32,
        /// Evenly spaced colour stops, at least two.
        colors: Vec<Rgb>,
        /// Blend axis.
        direction: GradientDirection,
    },
    /// Repeating two-colour pattern.
    Pattern {
        /// Border and gap width in pixels.
        border_width: u32,
        /// Pattern shape.
        pattern: PatternKind,
        /// Base colour.
        background: Rgb,
        /// Pattern colour.
        foreground: Rgb,
        /// Repeat period in pixels.
        spacing: u32,
    },
    /// Procedural texture tinted by a base colour.
    Texture {
        /// Border and gap width in pixels.
        border_width: u32,
        /// Texture kind.
        texture: TextureKind,
        /// Base colour.
        color: Rgb,
    },
    /// Bitmap stretched over the canvas.
    Image {
        /// Border and gap width in pixels.
        border_width: u32,
        /// URI of the background bitmap.
        source_uri: String,
        /// Colour painted when the bitmap cannot be loaded.
        fallback_color: Rgb,
    },
}

impl FrameKind {
    /// Border and gap width in pixels.
    pub fn border_width(&self) -> u32 {
        match self {
            FrameKind::Solid { border_width, .. }
            | FrameKind::Gradient { border_width, .. }
            | FrameKind::Pattern { border_width, .. }
            | FrameKind::Texture { border_width, .. }
            | FrameKind::Image { border_width, .. } => *border_width,
        }
    }

    /// Single colour representing the border, when the kind has one.
    pub fn border_color(&self) -> Option<Rgb> {
        match self {
            FrameKind::Solid { border_color, .. } => Some(*border_color),
            FrameKind::Pattern { background, .. } => Some(*background),
            FrameKind::Texture { color, .. } => Some(*color),
            FrameKind::Gradient { .. } | FrameKind::Image { .. } => None,
        }
    }

    /// Wire tag of the kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            FrameKind::Solid { .. } => "solid",
            FrameKind::Gradient { .. } => "gradient",
            FrameKind::Pattern { .. } => "pattern",
            FrameKind::Texture { .. } => "texture",
            FrameKind::Image { .. } => "image",
        }
    }
}

/// Named frame selectable in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStyle {
    /// Stable identifier, e.g. `thin_black`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tab grouping.
    pub category: FrameCategory,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Rendering parameters.
    pub style: FrameKind,
}

impl FrameStyle {
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        let border_width = self.style.border_width();
        if border_width > MAX_BORDER_WIDTH {
            return Err(CatalogError::OutOfRange {
                id: self.id.clone(),
                field: "border_width",
                value: border_width as f32,
            });
        }

        match &self.style {
            FrameKind::Gradient { colors, .. } if colors.len() < 2 => {
                Err(CatalogError::IncompleteGradient(self.id.clone()))
            }
            FrameKind::Pattern { spacing: 0, .. } => Err(CatalogError::OutOfRange {
                id: self.id.clone(),
                field: "spacing",
                value: 0.0,
            }),
            FrameKind::Image { source_uri, .. } if source_uri.trim().is_empty() => {
                Err(CatalogError::MissingImageSource(self.id.clone()))
            }
            _ => Ok(()),
        }
    }
}
