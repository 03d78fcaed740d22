//! Colour type and IconSmith colour-token resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::{IconError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque grey with the same value in all channels.
    pub const fn grey(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        match hex.len() {
            6 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                let a = parse_hex_byte(&hex[6..8])?;
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(IconError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use #RRGGBB or #RRGGBBAA format".to_string()),
            }),
        }
    }

    /// Convert to an RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Colour {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| IconError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

/// The neutral icon-colour tone IconSmith sources default to.
pub const ICON_COLOUR: Colour = Colour::rgb(0xcf, 0xd4, 0xe5);

/// Fallback grey used when a token is unresolvable and no fill is active.
pub const FALLBACK_GREY: Colour = Colour::rgb(0x88, 0x88, 0x88);

/// Resolve an IconSmith colour token to a concrete colour.
///
/// Tokens come in three forms:
/// - symbolic names (`iconcolor`, `outlinecolor`, `shadowcolor`,
///   `highlightcolor`), matched case-insensitively;
/// - signed integer palette indices, looked up in the curated table
///   below or mapped through a grey ramp when absent;
/// - anything else falls back to `base_fill`, or a neutral grey.
///
/// Resolution is pure: the result depends only on the token and the
/// supplied fallback fill.
pub fn resolve_token(token: &str, base_fill: Option<Colour>) -> Colour {
    let token = token.trim();
    match token.to_ascii_lowercase().as_str() {
        "iconcolor" => return ICON_COLOUR,
        "outlinecolor" => return Colour::BLACK,
        "shadowcolor" => return Colour::new(0, 0, 0, 0x88),
        "highlightcolor" => return Colour::WHITE,
        _ => {}
    }

    let value: i32 = match token.parse() {
        Ok(v) => v,
        Err(_) => return base_fill.unwrap_or(FALLBACK_GREY),
    };

    if let Some(colour) = curated_index(value) {
        return colour;
    }

    // Unmapped indices degrade to a monotonic grey ramp: larger
    // magnitude yields a darker (or equal) grey.
    let norm = ((-value) as f32 / 320.0).clamp(0.0, 1.0);
    let channel = (235.0 - norm * 150.0).round().clamp(0.0, 255.0) as u8;
    Colour::grey(channel)
}

/// Curated palette indices observed in IRIX icon sources.
///
/// These preserve visual fidelity with the original authoring tool;
/// everything else goes through the grey ramp.
fn curated_index(value: i32) -> Option<Colour> {
    let colour = match value {
        -238 => Colour::rgb(0xdc, 0xdc, 0xe7),
        -200 => Colour::rgb(0xc5, 0xd5, 0xf5),
        -176 => Colour::rgb(0xb7, 0xc7, 0xec),
        -168 => Colour::rgb(0xa2, 0xb4, 0xde),
        -136 => Colour::rgb(0x80, 0x91, 0xc4),
        -135 => Colour::rgb(0x77, 0x8a, 0xbf),
        -128 => Colour::rgb(0x9b, 0xa6, 0xcc),
        -119 => Colour::rgb(0xe6, 0xe8, 0xf1),
        -102 => Colour::rgb(0x5d, 0x73, 0xad),
        -85 => Colour::rgb(0x42, 0x54, 0x8f),
        -84 => Colour::rgb(0x41, 0x5a, 0x9f),
        -68 => Colour::rgb(0x32, 0x43, 0x81),
        -51 => Colour::rgb(0x9f, 0x6f, 0x6f),
        -32 => Colour::rgb(0x6c, 0x88, 0xba),
        -17 => Colour::rgb(0xdf, 0xe3, 0xef),
        -1 => Colour::rgb(0xf7, 0xf8, 0xfc),
        _ => return None,
    };
    Some(colour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("0b0715").unwrap();
        assert_eq!(c, Colour::rgb(0x0b, 0x07, 0x15));
    }

    #[test]
    fn test_from_hex_8digit() {
        let c = Colour::from_hex("#00000088").unwrap();
        assert_eq!(c, Colour::new(0, 0, 0, 0x88));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("#gggggg").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        assert_eq!(Colour::rgb(0xcf, 0xd4, 0xe5).to_string(), "#CFD4E5");
        assert_eq!(Colour::new(0, 0, 0, 0x88).to_string(), "#00000088");
    }

    #[test]
    fn test_resolve_named_tokens() {
        assert_eq!(resolve_token("iconcolor", None), ICON_COLOUR);
        assert_eq!(resolve_token("outlinecolor", None), Colour::BLACK);
        assert_eq!(resolve_token("shadowcolor", None), Colour::new(0, 0, 0, 0x88));
        assert_eq!(resolve_token("highlightcolor", None), Colour::WHITE);
    }

    #[test]
    fn test_named_token_ignores_fill_state() {
        // Symbolic tokens resolve the same regardless of the active fill.
        let active = Some(Colour::rgb(1, 2, 3));
        assert_eq!(resolve_token("iconcolor", active), ICON_COLOUR);
    }

    #[test]
    fn test_resolve_curated_index() {
        assert_eq!(resolve_token("-1", None), Colour::rgb(0xf7, 0xf8, 0xfc));
        assert_eq!(resolve_token("-85", None), Colour::rgb(0x42, 0x54, 0x8f));
    }

    #[test]
    fn test_resolve_unknown_token_falls_back() {
        let fill = Colour::rgb(10, 20, 30);
        assert_eq!(resolve_token("nonsense", Some(fill)), fill);
        assert_eq!(resolve_token("nonsense", None), FALLBACK_GREY);
    }

    #[test]
    fn test_grey_ramp_monotonic() {
        // Indices outside the curated table map to a grey ramp where
        // larger magnitude is darker or equal.
        let mut previous = 255u8;
        for value in [-2, -50, -100, -250, -319, -320, -999] {
            let c = resolve_token(&value.to_string(), None);
            assert_eq!(c.r, c.g);
            assert_eq!(c.g, c.b);
            assert!(c.r <= previous, "ramp not monotonic at {}", value);
            previous = c.r;
        }
    }

    #[test]
    fn test_grey_ramp_extremes() {
        // -999 saturates the ramp at its darkest grey.
        assert_eq!(resolve_token("-999", None), Colour::grey(85));
        // A darker grey than the curated -1 entry.
        let near_white = resolve_token("-1", None);
        assert!(resolve_token("-999", None).r < near_white.r);
    }
}
