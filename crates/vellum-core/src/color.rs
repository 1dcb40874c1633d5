//! RGB colors and the `#RRGGBB` / `#RGB` hex convention used by the
//! scene boundary and the material files.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VellumError};

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Creates a color from components in `[0, 1]`.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` or `#RGB` hex string.
    ///
    /// Short-form digits are doubled (`#f0a` is `#ff00aa`).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || VellumError::InvalidColor(hex.to_string());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        let channels: [u8; 3] = match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    out[i] = v * 16 + v;
                }
                out
            }
            6 => {
                let mut out = [0u8; 3];
                for (i, pair) in digits.as_bytes().chunks(2).enumerate() {
                    let s = std::str::from_utf8(pair).map_err(|_| invalid())?;
                    out[i] = u8::from_str_radix(s, 16).map_err(|_| invalid())?;
                }
                out
            }
            _ => return Err(invalid()),
        };

        Ok(Self::new(
            f32::from(channels[0]) / 255.0,
            f32::from(channels[1]) / 255.0,
            f32::from(channels[2]) / 255.0,
        ))
    }

    /// Formats as a lowercase `#rrggbb` string.
    #[must_use]
    pub fn to_hex(self) -> String {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
