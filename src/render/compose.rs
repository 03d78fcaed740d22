//! Master-image composition: background + drop shadow + foreground.

use image::{imageops, GrayImage, Rgba, RgbaImage};

use crate::render::blend::composite_over;

/// Shadow strength for rasterized vector layers.
const LAYER_SHADOW_STRENGTH: u16 = 150;

/// Composite a rasterized foreground layer onto the backdrop.
///
/// The layer's alpha mask is tinted black, blurred with a radius that
/// scales with the canvas, and placed at a small positive offset under
/// the layer itself. The mask passes through untouched for the variant
/// derivation stage.
pub fn compose_layer(background: &RgbaImage, layer: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let size = background.width();
    let mut composed = background.clone();

    let blur_radius = (size / 70).max(12) as f32;
    let shadow_alpha = imageops::blur(mask, blur_radius);

    let mut shadow = RgbaImage::new(size, size);
    for (x, y, px) in shadow_alpha.enumerate_pixels() {
        let a = (px.0[0] as u16 * LAYER_SHADOW_STRENGTH / 255) as u8;
        shadow.put_pixel(x, y, Rgba([0, 0, 0, a]));
    }

    let offset = (size / 90) as i64;
    composite_over(&mut composed, &shadow, offset, offset);
    composite_over(&mut composed, layer, 0, 0);
    composed
}

/// Place a pre-rasterized bitmap icon onto the backdrop.
///
/// The bitmap is scaled (never shrunk, nearest-neighbour to keep the
/// authentic pixel look) to fit 60% of the width and 55% of the height,
/// centred horizontally with its baseline resting at 62% of the canvas
/// height. Returns the composed image and the placement mask.
pub fn place_bitmap(background: &RgbaImage, bitmap: &RgbaImage) -> (RgbaImage, GrayImage) {
    let size = background.width();

    let max_width = (size as f32 * 0.6) as u32;
    let max_height = (size as f32 * 0.55) as u32;
    let scale = (max_width as f32 / bitmap.width() as f32)
        .min(max_height as f32 / bitmap.height() as f32)
        .max(1.0);

    let new_w = ((bitmap.width() as f32 * scale).round() as u32).max(1);
    let new_h = ((bitmap.height() as f32 * scale).round() as u32).max(1);
    let scaled = imageops::resize(bitmap, new_w, new_h, imageops::FilterType::Nearest);

    let pos_x = (size as i64 - new_w as i64) / 2;
    let pos_y = (size as f32 * 0.62) as i64 - new_h as i64;

    // Shadow from the bitmap's own alpha, blurred in place.
    let mut shadow = RgbaImage::new(new_w, new_h);
    for (x, y, px) in scaled.enumerate_pixels() {
        shadow.put_pixel(x, y, Rgba([0, 0, 0, px.0[3]]));
    }
    let blur_radius = (size / 85).max(8) as f32;
    let shadow = imageops::blur(&shadow, blur_radius);

    let mut composed = background.clone();
    composite_over(
        &mut composed,
        &shadow,
        pos_x + (size / 90) as i64,
        pos_y + (size / 70) as i64,
    );
    composite_over(&mut composed, &scaled, pos_x, pos_y);

    let mut mask = GrayImage::new(size, size);
    for (x, y, px) in scaled.enumerate_pixels() {
        let mx = pos_x + x as i64;
        let my = pos_y + y as i64;
        if mx >= 0 && my >= 0 && mx < size as i64 && my < size as i64 {
            mask.put_pixel(mx as u32, my as u32, image::Luma([px.0[3]]));
        }
    }

    (composed, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::background::background;
    use crate::render::raster::rasterize;
    use crate::parser::parse_fti;

    const SQUARE: &str = "\
bgnpolygon();
vertex(0, 0);
vertex(100, 0);
vertex(100, 100);
vertex(0, 100);
endpolygon();
";

    #[test]
    fn test_compose_keeps_canvas_size() {
        let bg = background(64);
        let (layer, mask) = rasterize(&parse_fti(SQUARE), 64);
        let composed = compose_layer(&bg, &layer, &mask);
        assert_eq!(composed.dimensions(), (64, 64));
    }

    #[test]
    fn test_empty_layer_leaves_background() {
        let bg = background(64);
        let (layer, mask) = rasterize(&[], 64);
        let composed = compose_layer(&bg, &layer, &mask);
        assert_eq!(composed.as_raw(), bg.as_raw());
    }

    #[test]
    fn test_foreground_pixels_replace_background() {
        let bg = background(64);
        let (layer, mask) = rasterize(&parse_fti(SQUARE), 64);
        let composed = compose_layer(&bg, &layer, &mask);
        // Canvas centre is inside the opaque filled square.
        let centre = composed.get_pixel(32, 32);
        let fill = layer.get_pixel(32, 32);
        assert_eq!(centre, fill);
        assert_ne!(centre, bg.get_pixel(32, 32));
    }

    #[test]
    fn test_shadow_falls_outside_silhouette() {
        let bg = background(256);
        let (layer, mask) = rasterize(&parse_fti(SQUARE), 256);
        let composed = compose_layer(&bg, &layer, &mask);

        // Just beyond the square's bottom-right corner the blurred,
        // offset shadow darkens the backdrop.
        let square_edge = (256.0 * (0.5 + 0.36)) as u32;
        let probe = square_edge + 4;
        let shadowed = composed.get_pixel(probe, probe);
        let plain = bg.get_pixel(probe, probe);
        let lum = |p: &Rgba<u8>| p.0[0] as u32 + p.0[1] as u32 + p.0[2] as u32;
        assert!(lum(shadowed) < lum(plain));
    }

    #[test]
    fn test_place_bitmap_centres_horizontally() {
        let bg = background(100);
        let bitmap = RgbaImage::from_pixel(10, 10, Rgba([200, 10, 10, 255]));
        let (composed, mask) = place_bitmap(&bg, &bitmap);
        assert_eq!(composed.dimensions(), (100, 100));

        // 10x10 scaled by min(60/10, 55/10) = 5.5 -> 55x55, centred.
        let lit: Vec<u32> = mask
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, _, _)| x)
            .collect();
        let min_x = *lit.iter().min().unwrap();
        let max_x = *lit.iter().max().unwrap();
        assert_eq!(min_x, 22);
        assert_eq!(max_x, 76);
    }

    #[test]
    fn test_place_bitmap_never_shrinks() {
        let bg = background(32);
        // 40x40 bitmap cannot fit 60% of 32px; scale clamps at 1.0.
        let bitmap = RgbaImage::from_pixel(40, 40, Rgba([200, 10, 10, 255]));
        let (_, mask) = place_bitmap(&bg, &bitmap);
        // The bitmap overflows the canvas; the visible part is masked.
        assert!(mask.pixels().any(|p| p.0[0] > 0));
    }
}
