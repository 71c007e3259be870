//! RGB colour type and hex parsing utilities
//!
//! Colours are plain 24-bit RGB triples. The editor's interchange format
//! writes them as `#RRGGBB` hex strings, so parsing and formatting live
//! here alongside the type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for colour parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty colour string")]
    Empty,
    /// Invalid length (must be 6 hex chars, with or without leading #)
    #[error("invalid colour length {0}, expected 6 hex digits")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Format as an uppercase `#RRGGBB` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Parse a `#RRGGBB` (or bare `RRGGBB`) hex string into an RGB colour.
///
/// # Examples
///
/// ```
/// use tilegfx::color::{parse_hex_colour, Rgb};
///
/// let red = parse_hex_colour("#FF0000").unwrap();
/// assert_eq!(red, Rgb::new(255, 0, 0));
///
/// let teal = parse_hex_colour("008080").unwrap();
/// assert_eq!(teal, Rgb::new(0, 128, 128));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty, the wrong length, or
/// contains non-hex characters.
pub fn parse_hex_colour(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(ColorError::InvalidLength(hex.len()));
    }

    for c in hex.chars() {
        if !c.is_ascii_hexdigit() {
            return Err(ColorError::InvalidHex(c));
        }
    }

    let r = parse_hex_pair(&hex[0..2])?;
    let g = parse_hex_pair(&hex[2..4])?;
    let b = parse_hex_pair(&hex[4..6])?;
    Ok(Rgb::new(r, g, b))
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
pub(crate) fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}

/// Parse a two-character hex string to u8 (0-255)
pub(crate) fn parse_hex_pair(s: &str) -> Result<u8, ColorError> {
    let mut chars = s.chars();
    let high = parse_hex_digit(chars.next().ok_or(ColorError::Empty)?)?;
    let low = parse_hex_digit(chars.next().ok_or(ColorError::Empty)?)?;
    Ok(high * 16 + low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colour_with_hash() {
        assert_eq!(parse_hex_colour("#FF0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_hex_colour("#00FF00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_hex_colour("#0000FF").unwrap(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_parse_hex_colour_without_hash() {
        assert_eq!(parse_hex_colour("C0FFEE").unwrap(), Rgb::new(192, 255, 238));
    }

    #[test]
    fn test_parse_hex_colour_lowercase() {
        assert_eq!(parse_hex_colour("#ffaa55").unwrap(), Rgb::new(255, 170, 85));
    }

    #[test]
    fn test_parse_hex_colour_empty() {
        assert_eq!(parse_hex_colour(""), Err(ColorError::Empty));
    }

    #[test]
    fn test_parse_hex_colour_short() {
        assert_eq!(parse_hex_colour("#F00"), Err(ColorError::InvalidLength(3)));
    }

    #[test]
    fn test_parse_hex_colour_long() {
        assert_eq!(parse_hex_colour("#FF0000AA"), Err(ColorError::InvalidLength(8)));
    }

    #[test]
    fn test_parse_hex_colour_bad_digit() {
        assert_eq!(parse_hex_colour("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_to_hex_roundtrip() {
        let c = Rgb::new(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(parse_hex_colour(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn test_to_hex_uppercase() {
        assert_eq!(Rgb::new(255, 170, 85).to_hex(), "#FFAA55");
    }
}
