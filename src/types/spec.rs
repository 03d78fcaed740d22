//! Output specification table for the exported icon set.
//!
//! Each [`IconSpec`] row describes one required output image. The table
//! is fixed configuration, not derived at runtime: it fully determines
//! the exported file set and the manifest contents.

use serde::Serialize;

/// Appearance variants derived from the master image.
///
/// Exactly three exist; every spec row selects one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Regular,
    Dark,
    Tinted,
}

/// An appearance discriminator attached to a spec row, serialized into
/// the manifest as `{"appearance": "luminosity", "value": "dark"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    pub appearance: String,
    pub value: String,
}

impl Appearance {
    /// A `luminosity` discriminator with the given value.
    pub fn luminosity(value: impl Into<String>) -> Self {
        Self {
            appearance: "luminosity".to_string(),
            value: value.into(),
        }
    }
}

/// A declarative row in the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    /// Device idiom ("universal" or "mac").
    pub idiom: String,
    /// Logical point size.
    pub size: u32,
    /// Scale multiplier.
    pub scale: u32,
    /// Output filename, unique across the table.
    pub filename: String,
    /// Optional platform discriminator.
    pub platform: Option<String>,
    /// Optional appearance discriminators.
    pub appearances: Vec<Appearance>,
}

impl IconSpec {
    /// Create a plain spec row with no platform or appearances.
    pub fn new(idiom: impl Into<String>, size: u32, scale: u32, filename: impl Into<String>) -> Self {
        Self {
            idiom: idiom.into(),
            size,
            scale,
            filename: filename.into(),
            platform: None,
            appearances: Vec::new(),
        }
    }

    /// Pixel edge length of the exported image.
    pub fn pixel_size(&self) -> u32 {
        self.size * self.scale
    }

    /// Which appearance variant this row exports.
    ///
    /// Dark-marked filenames use the dark variant, tinted-marked use
    /// tinted, everything else regular.
    pub fn variant(&self) -> Variant {
        if self.filename.contains("Dark") {
            Variant::Dark
        } else if self.filename.contains("Tinted") {
            Variant::Tinted
        } else {
            Variant::Regular
        }
    }
}

/// The builtin `AppIcon.appiconset` table.
pub struct BuiltinSpecs;

impl BuiltinSpecs {
    /// The full 13-row output table: three universal 1024 entries
    /// (regular/dark/tinted) plus mac entries at 16..512 in @1x/@2x.
    pub fn all() -> Vec<IconSpec> {
        let mut specs = vec![
            IconSpec {
                platform: Some("ios".to_string()),
                ..IconSpec::new("universal", 1024, 1, "AppIcon-Universal-1024.png")
            },
            IconSpec {
                platform: Some("ios".to_string()),
                appearances: vec![Appearance::luminosity("dark")],
                ..IconSpec::new("universal", 1024, 1, "AppIcon-Universal-1024-Dark.png")
            },
            IconSpec {
                platform: Some("ios".to_string()),
                appearances: vec![Appearance::luminosity("tinted")],
                ..IconSpec::new("universal", 1024, 1, "AppIcon-Universal-1024-Tinted.png")
            },
        ];

        for size in [16u32, 32, 128, 256, 512] {
            specs.push(IconSpec::new("mac", size, 1, format!("AppIcon-mac-{size}.png")));
            specs.push(IconSpec::new(
                "mac",
                size,
                2,
                format!("AppIcon-mac-{size}@2x.png"),
            ));
        }

        specs
    }
}
