//! RGB colors and tolerance-based comparison

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

/// A 24-bit RGB color. Alpha is ignored everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value; bits above 24 are dropped
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Color of a captured pixel
    pub fn from_pixel(pixel: &Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self { r, g, b }
    }

    /// True if every channel of `self` lies within `tolerance` of `reference`.
    ///
    /// The band is relative to the reference channel, so a zero reference
    /// channel only ever matches zero.
    pub fn fuzzy_matches(self, reference: Color, tolerance: f64) -> bool {
        fuzzy_channel_match(reference.r, self.r, tolerance)
            && fuzzy_channel_match(reference.g, self.g, tolerance)
            && fuzzy_channel_match(reference.b, self.b, tolerance)
    }
}

/// Boundary-inclusive check that `value` lies in
/// `[reference * (1 - tolerance), reference * (1 + tolerance)]`.
pub fn fuzzy_channel_match(reference: u8, value: u8, tolerance: f64) -> bool {
    let reference = f64::from(reference);
    let value = f64::from(value);
    let spread = reference * tolerance;
    value >= reference - spread && value <= reference + spread
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Error returned when a color string is not six hex digits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected six hex digits like 110c07")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        format!("{:06x}", color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_match_is_reflexive() {
        for v in [0u8, 1, 17, 128, 255] {
            for p in [0.0, 0.05, 0.1, 0.5, 0.99] {
                assert!(fuzzy_channel_match(v, v, p), "v={} p={}", v, p);
            }
        }
    }

    #[test]
    fn test_channel_match_boundary_is_inclusive() {
        assert!(fuzzy_channel_match(100, 110, 0.1));
        assert!(fuzzy_channel_match(100, 90, 0.1));
        assert!(!fuzzy_channel_match(100, 111, 0.1));
        assert!(!fuzzy_channel_match(100, 89, 0.1));
    }

    #[test]
    fn test_zero_tolerance_is_exact() {
        assert!(fuzzy_channel_match(42, 42, 0.0));
        assert!(!fuzzy_channel_match(42, 43, 0.0));
    }

    #[test]
    fn test_color_fuzzy_match() {
        let feather = Color::from_hex(0x110c07);
        assert!(feather.fuzzy_matches(feather, 0.1));
        assert!(!Color::from_hex(0xffffff).fuzzy_matches(feather, 0.1));
    }

    #[test]
    fn test_every_channel_must_match() {
        let reference = Color::new(100, 100, 100);
        assert!(Color::new(105, 95, 110).fuzzy_matches(reference, 0.1));
        assert!(!Color::new(105, 95, 111).fuzzy_matches(reference, 0.1));
    }

    #[test]
    fn test_hex_round_trip_and_alpha_ignored() {
        let color = Color::from_hex(0x64989e);
        assert_eq!((color.r, color.g, color.b), (0x64, 0x98, 0x9e));
        assert_eq!(color.to_hex(), 0x64989e);
        assert_eq!(Color::from_pixel(&Rgba([0x64, 0x98, 0x9e, 0])), color);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!("110c07".parse::<Color>(), Ok(Color::from_hex(0x110c07)));
        assert_eq!("#64989E".parse::<Color>(), Ok(Color::from_hex(0x64989e)));
        assert_eq!("0xffffff".parse::<Color>(), Ok(Color::from_hex(0xffffff)));
        assert!("12345".parse::<Color>().is_err());
        assert!("zzzzzz".parse::<Color>().is_err());
        assert_eq!(Color::from_hex(0x0a0b0c).to_string(), "#0a0b0c");
    }
}
