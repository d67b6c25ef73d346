//! Hex color handling for recipe material classes.
//!
//! Recipe colors are `#RRGGBB` strings, case-insensitive, without alpha.

use serde::{Deserialize, Serialize};

/// RGB color with f64 components (0.0 to 1.0 range).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Create a new color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string. Hex digits are case-insensitive.
    ///
    /// Returns `None` for anything else, including `#RGB` shorthand and
    /// `#RRGGBBAA` (alpha is not part of the recipe format).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Format as an uppercase `#RRGGBB` string.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Clamp all components to [0.0, 1.0].
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        ]
    }

    /// Create from 8-bit RGB.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f64 / 255.0,
            g: rgb[1] as f64 / 255.0,
            b: rgb[2] as f64 / 255.0,
        }
    }

    /// Convert to f32 components for renderer handoff.
    pub fn to_f32_array(&self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}
