//! Pixel blending helpers shared by the render modules.
//!
//! All compositing in the pipeline is plain source-over with straight
//! (non-premultiplied) alpha, matching the behaviour of the original
//! authoring pipeline.

use image::{Rgba, RgbaImage};

use crate::types::Colour;

/// Source-over blend of one colour onto one pixel.
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, colour: Colour) {
    if x >= img.width() || y >= img.height() {
        return;
    }
    let dst = *img.get_pixel(x, y);
    img.put_pixel(x, y, over(Rgba(colour.to_rgba()), dst));
}

/// Source-over blend of two RGBA pixels.
pub fn over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src.0[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }

    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let sc = src.0[c] as f32;
        let dc = dst.0[c] as f32;
        let v = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Source-over composite `overlay` onto `base` at an offset.
///
/// Regions falling outside the base are clipped.
pub fn composite_over(base: &mut RgbaImage, overlay: &RgbaImage, dx: i64, dy: i64) {
    for (ox, oy, &px) in overlay.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        let bx = ox as i64 + dx;
        let by = oy as i64 + dy;
        if bx < 0 || by < 0 || bx >= base.width() as i64 || by >= base.height() as i64 {
            continue;
        }
        let dst = *base.get_pixel(bx as u32, by as u32);
        base.put_pixel(bx as u32, by as u32, over(px, dst));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_opaque_replaces() {
        let out = over(Rgba([10, 20, 30, 255]), Rgba([1, 2, 3, 255]));
        assert_eq!(out, Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_over_transparent_keeps_dst() {
        let out = over(Rgba([10, 20, 30, 0]), Rgba([1, 2, 3, 255]));
        assert_eq!(out, Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_over_half_alpha_on_opaque() {
        let out = over(Rgba([255, 255, 255, 128]), Rgba([0, 0, 0, 255]));
        assert_eq!(out.0[3], 255);
        // Roughly half-way grey.
        assert!((out.0[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_composite_clips_outside() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        composite_over(&mut base, &overlay, 2, 2);
        assert_eq!(*base.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*base.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
    }
}
