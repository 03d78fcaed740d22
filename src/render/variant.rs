//! Appearance-variant derivation.
//!
//! Exactly three appearance states exist. Each is a deterministic
//! transform of the same two inputs: the master image and the
//! foreground alpha mask. Any future appearance should follow the same
//! shape rather than re-rendering the icon.

use image::{GrayImage, RgbaImage};
use palette::{Hsl, IntoColor, Srgb};

use crate::types::{Colour, Variant};

/// Neutral icon-colour glaze applied to the regular variant.
const GLAZE_COLOUR: Colour = Colour::rgb(0xce, 0xd3, 0xde);
/// Glaze opacity within the masked region.
const GLAZE_OPACITY: u8 = 60;

/// Accent tone for the tinted variant.
const ACCENT_COLOUR: Colour = Colour::rgb(0x57, 0xd8, 0xff);
/// Mix ratio between the master and the accent overlay.
const TINT_MIX: f32 = 0.42;

/// Brightness factor for the dark variant.
const DARK_BRIGHTNESS: f32 = 0.82;
/// Saturation factor for the dark variant.
const DARK_SATURATION: f32 = 0.92;

/// The three derived appearance images.
pub struct VariantSet {
    pub regular: RgbaImage,
    pub dark: RgbaImage,
    pub tinted: RgbaImage,
}

impl VariantSet {
    /// Look up the image for an appearance variant.
    pub fn get(&self, variant: Variant) -> &RgbaImage {
        match variant {
            Variant::Regular => &self.regular,
            Variant::Dark => &self.dark,
            Variant::Tinted => &self.tinted,
        }
    }
}

/// Derive all three appearance variants from the master image.
pub fn derive_variants(master: &RgbaImage, mask: &GrayImage) -> VariantSet {
    VariantSet {
        regular: regular_variant(master, mask),
        dark: dark_variant(master),
        tinted: tinted_variant(master, mask),
    }
}

/// Regular: a low-opacity neutral glaze inside the masked region only,
/// keeping the silhouette untouched while tying the foreground to the
/// backdrop family.
fn regular_variant(master: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = master.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let m = mask.get_pixel(x, y).0[0] as f32 / 255.0;
        if m <= 0.0 {
            continue;
        }
        let glaze_alpha = GLAZE_OPACITY as f32 / 255.0 * m;
        for (c, channel) in [GLAZE_COLOUR.r, GLAZE_COLOUR.g, GLAZE_COLOUR.b]
            .into_iter()
            .enumerate()
        {
            let v = px.0[c] as f32 * (1.0 - glaze_alpha) + channel as f32 * glaze_alpha;
            px.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Dark: uniform dimming, no masking. The whole composition dims for
/// dark appearance contexts.
fn dark_variant(master: &RgbaImage) -> RgbaImage {
    let mut out = master.clone();
    for px in out.pixels_mut() {
        let rgb: Srgb<f32> = Srgb::new(
            px.0[0] as f32 / 255.0,
            px.0[1] as f32 / 255.0,
            px.0[2] as f32 / 255.0,
        );
        let mut hsl: Hsl = rgb.into_color();
        hsl.lightness = (hsl.lightness * DARK_BRIGHTNESS).clamp(0.0, 1.0);
        hsl.saturation = (hsl.saturation * DARK_SATURATION).clamp(0.0, 1.0);
        let rgb_out: Srgb<f32> = hsl.into_color();

        px.0[0] = (rgb_out.red * 255.0).round().clamp(0.0, 255.0) as u8;
        px.0[1] = (rgb_out.green * 255.0).round().clamp(0.0, 255.0) as u8;
        px.0[2] = (rgb_out.blue * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Tinted: select the accent through the mask, then blend the result
/// with the untouched master at a fixed ratio. The glyph reads as
/// monochrome accent while the backdrop stays visible through the mix.
fn tinted_variant(master: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = master.clone();
    let accent = [
        ACCENT_COLOUR.r as f32,
        ACCENT_COLOUR.g as f32,
        ACCENT_COLOUR.b as f32,
        255.0,
    ];
    for (x, y, px) in out.enumerate_pixels_mut() {
        let m = mask.get_pixel(x, y).0[0] as f32 / 255.0;
        if m <= 0.0 {
            continue;
        }
        for c in 0..4 {
            let original = px.0[c] as f32;
            let overlaid = original + (accent[c] - original) * m;
            let v = original + (overlaid - original) * TINT_MIX;
            px.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    fn fixture() -> (RgbaImage, GrayImage) {
        let mut master = RgbaImage::from_pixel(8, 8, Rgba([60, 40, 120, 255]));
        let mut mask = GrayImage::new(8, 8);
        // Foreground occupies the left half.
        for y in 0..8 {
            for x in 0..4 {
                master.put_pixel(x, y, Rgba([200, 180, 160, 255]));
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        (master, mask)
    }

    #[test]
    fn test_regular_only_touches_masked_region() {
        let (master, mask) = fixture();
        let set = derive_variants(&master, &mask);

        assert_ne!(set.regular.get_pixel(1, 1), master.get_pixel(1, 1));
        assert_eq!(set.regular.get_pixel(6, 6), master.get_pixel(6, 6));
    }

    #[test]
    fn test_regular_keeps_alpha() {
        let (master, mask) = fixture();
        let set = derive_variants(&master, &mask);
        assert!(set.regular.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_dark_dims_everything() {
        let (master, mask) = fixture();
        let set = derive_variants(&master, &mask);

        for (dark, original) in set.dark.pixels().zip(master.pixels()) {
            let dark_sum: u32 = dark.0[..3].iter().map(|&v| v as u32).sum();
            let orig_sum: u32 = original.0[..3].iter().map(|&v| v as u32).sum();
            assert!(dark_sum < orig_sum);
        }
    }

    #[test]
    fn test_tinted_shifts_masked_region_toward_accent() {
        let (master, mask) = fixture();
        let set = derive_variants(&master, &mask);

        let tinted = set.tinted.get_pixel(1, 1);
        let original = master.get_pixel(1, 1);
        // Blue channel rises toward the accent, red falls.
        assert!(tinted.0[2] > original.0[2]);
        assert!(tinted.0[0] < original.0[0]);
        // Outside the mask nothing changes.
        assert_eq!(set.tinted.get_pixel(6, 6), master.get_pixel(6, 6));
    }

    #[test]
    fn test_variant_set_lookup() {
        let (master, mask) = fixture();
        let set = derive_variants(&master, &mask);
        assert_eq!(set.get(Variant::Dark).as_raw(), set.dark.as_raw());
        assert_eq!(set.get(Variant::Tinted).as_raw(), set.tinted.as_raw());
        assert_eq!(set.get(Variant::Regular).as_raw(), set.regular.as_raw());
    }
}
