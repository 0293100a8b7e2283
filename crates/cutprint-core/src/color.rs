//! Colour values and contrast helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

/// Opaque 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Creates a colour from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidColor`] for any other shape.
    pub fn from_hex(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidColor(raw.to_string());
        let digits = raw.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Formats as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Returns `[r, g, b, 255]`.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(raw)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Text colour picked for legibility on a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    /// White text for dark backgrounds.
    White,
    /// Black text for light backgrounds.
    Black,
}

impl TextColor {
    /// Returns the concrete colour.
    pub fn rgb(self) -> Rgb {
        match self {
            TextColor::White => Rgb::WHITE,
            TextColor::Black => Rgb::BLACK,
        }
    }
}

/// Relative luminance `(0.299r + 0.587g + 0.114b) / 255`, in `[0, 1]`.
pub fn relative_luminance(color: Rgb) -> f64 {
    (0.299 * color.r as f64 + 0.587 * color.g as f64 + 0.114 * color.b as f64) / 255.0
}

/// White text when luminance is at most 0.5, black otherwise.
pub fn contrast_text_color(background: Rgb) -> TextColor {
    if relative_luminance(background) <= 0.5 {
        TextColor::White
    } else {
        TextColor::Black
    }
}
