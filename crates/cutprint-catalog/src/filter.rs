//! Filter effect definitions.

use cutprint_core::Rgb;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Tab grouping for filters. Declaration order is the UI tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    /// Neutral adjustments.
    Basic,
    /// Warm colour casts.
    Warm,
    /// Cool colour casts.
    Cool,
    /// Black and white looks.
    Mono,
    /// Aged and faded looks.
    Vintage,
}

/// Flat colour composited over a photo slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorOverlay {
    /// Overlay colour.
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Pixel adjustments. Absent fields are the identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterTransform {
    /// Brightness multiplier (1.0 = unchanged).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Contrast multiplier around mid-grey (1.0 = unchanged).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    /// Saturation multiplier (1.0 = unchanged, 0.0 = grey).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f32>,
    /// Hue rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<f32>,
    /// Sepia intensity in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f32>,
    /// Grayscale intensity in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<f32>,
    /// Gaussian blur sigma in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
    /// Flat colour overlay applied last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<ColorOverlay>,
}

impl FilterTransform {
    /// Returns `true` when applying the transform cannot change a pixel.
    pub fn is_identity(&self) -> bool {
        let unit = |value: Option<f32>| value.is_none_or(|v| v == 1.0);
        let zero = |value: Option<f32>| value.is_none_or(|v| v == 0.0);

        unit(self.brightness)
            && unit(self.contrast)
            && unit(self.saturation)
            && zero(self.hue)
            && zero(self.sepia)
            && zero(self.grayscale)
            && zero(self.blur)
            && self.overlay.is_none_or(|overlay| overlay.opacity == 0.0)
    }

    pub(crate) fn validate(&self, id: &str) -> Result<(), CatalogError> {
        let out_of_range = |field: &'static str, value: f32| CatalogError::OutOfRange {
            id: id.to_string(),
            field,
            value,
        };

        for (field, value) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if let Some(value) = value
                && !(0.0..=4.0).contains(&value)
            {
                return Err(out_of_range(field, value));
            }
        }

        for (field, value) in [("sepia", self.sepia), ("grayscale", self.grayscale)] {
            if let Some(value) = value
                && !(0.0..=1.0).contains(&value)
            {
                return Err(out_of_range(field, value));
            }
        }

        if let Some(hue) = self.hue
            && !hue.is_finite()
        {
            return Err(out_of_range("hue", hue));
        }

        if let Some(blur) = self.blur
            && !(0.0..=50.0).contains(&blur)
        {
            return Err(out_of_range("blur", blur));
        }

        if let Some(overlay) = self.overlay
            && !(0.0..=1.0).contains(&overlay.opacity)
        {
            return Err(out_of_range("overlay.opacity", overlay.opacity));
        }

        Ok(())
    }
}

/// Named filter selectable in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEffect {
    /// Stable identifier, e.g. `bw_classic`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tab grouping.
    pub category: FilterCategory,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Pixel adjustments.
    #[serde(default)]
    pub transform: FilterTransform,
}
