//! Procedural backdrop generation.
//!
//! The backdrop is the Indigo Magic inspired look: a dark indigo field
//! with a diagonal colour sweep, a light glow anchored at the top-left
//! corner and a vignette pulling the edges toward black. It depends on
//! nothing but the target size, so every run reproduces it exactly.

use image::{Rgba, RgbaImage};

use crate::render::blend::over;
use crate::types::Colour;

/// Base field tone.
const BACKGROUND_DARK: Colour = Colour::rgb(0x0b, 0x07, 0x15);
/// Accent hue for the diagonal sweep.
const BACKGROUND_INDIGO: Colour = Colour::rgb(0x35, 0x20, 0x5c);
/// Light accent for the corner glow.
const BACKGROUND_GLOW: Colour = Colour::rgb(0xd0, 0xd0, 0xd6);

/// Sheet opacities, fixed.
const DIAGONAL_OPACITY: u8 = 200;
const GLOW_OPACITY: u8 = 95;
const VIGNETTE_OPACITY: u8 = 120;

/// Build the themed background at the given square size.
pub fn background(size: u32) -> RgbaImage {
    let mut base = RgbaImage::from_pixel(size, size, Rgba(BACKGROUND_DARK.to_rgba()));
    let span = (size.max(2) - 1) as f32;

    for y in 0..size {
        for x in 0..size {
            let fx = x as f32;
            let fy = y as f32;

            // Diagonal sweep from the dark base into the indigo accent.
            let t = (fx + fy) / (2.0 * span);
            let diagonal = gradient_pixel(BACKGROUND_DARK, BACKGROUND_INDIGO, t, DIAGONAL_OPACITY);

            // Glow: radial falloff centred past the bottom-right corner,
            // so the light end lands in the top-left of the canvas.
            let dist = ((span - fx).powi(2) + (span - fy).powi(2)).sqrt();
            let t = (dist / span).clamp(0.0, 1.0);
            let glow = gradient_pixel(BACKGROUND_INDIGO, BACKGROUND_GLOW, t, GLOW_OPACITY);

            // Vignette: dark centre fading to black at the edges.
            let half = span / 2.0;
            let dist = ((fx - half).powi(2) + (fy - half).powi(2)).sqrt();
            let t = (dist / half).clamp(0.0, 1.0);
            let vignette = gradient_pixel(BACKGROUND_DARK, Colour::BLACK, t, VIGNETTE_OPACITY);

            let mut px = *base.get_pixel(x, y);
            px = over(diagonal, px);
            px = over(glow, px);
            px = over(vignette, px);
            base.put_pixel(x, y, px);
        }
    }

    base
}

/// Interpolate between two colours and attach a sheet opacity.
fn gradient_pixel(from: Colour, to: Colour, t: f32, opacity: u8) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgba([lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b), opacity])
}
