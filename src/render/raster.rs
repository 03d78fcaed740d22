//! Rasterizer: shape sequences to RGBA layers.
//!
//! Shapes are fitted to the target canvas as a group: one bounding box
//! across every point, one uniform scale, centred, with the vertical
//! axis flipped (IconSmith's origin is bottom-left, image origin is
//! top-left). Filling is even-odd scanline at pixel centres; strokes
//! are drawn as round-capped thick segments.

use image::{GrayImage, Luma, RgbaImage};

use crate::render::blend::blend_pixel;
use crate::types::{Colour, Shape};

/// Fraction of the canvas the larger bounding-box dimension occupies.
pub const DEFAULT_FIT: f32 = 0.72;

/// Rasterize shapes at the default fit ratio.
pub fn rasterize(shapes: &[Shape], size: u32) -> (RgbaImage, GrayImage) {
    rasterize_with_fit(shapes, size, DEFAULT_FIT)
}

/// Rasterize shapes onto a transparent square canvas.
///
/// Returns the RGBA layer and its alpha mask. An empty shape sequence
/// (or one whose shapes all lack points) yields a fully transparent
/// layer and an all-zero mask.
pub fn rasterize_with_fit(shapes: &[Shape], size: u32, fit: f32) -> (RgbaImage, GrayImage) {
    let mut layer = RgbaImage::new(size, size);

    let points: Vec<(f32, f32)> = shapes.iter().flat_map(|s| s.points.iter().copied()).collect();
    if points.is_empty() {
        return (layer, GrayImage::new(size, size));
    }

    let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

    let width = (max_x - min_x).max(1e-4);
    let height = (max_y - min_y).max(1e-4);
    let scale = fit * size as f32 / width.max(height);

    let offset_x = (size as f32 - width * scale) / 2.0;
    let offset_y = (size as f32 - height * scale) / 2.0;

    let transform = |(x, y): (f32, f32)| {
        let tx = offset_x + (x - min_x) * scale;
        let ty = offset_y + (y - min_y) * scale;
        (tx, size as f32 - ty)
    };

    for shape in shapes {
        if shape.is_empty() {
            continue;
        }

        let pts: Vec<(f32, f32)> = shape.points.iter().copied().map(transform).collect();
        let stroke_px = stroke_width_px(shape.stroke_width, scale);

        if shape.is_closed() {
            if let Some(fill) = shape.fill {
                fill_polygon(&mut layer, &pts, fill);
            }
            if let Some(stroke) = shape.stroke {
                stroke_path(&mut layer, &pts, true, stroke_px, stroke);
            }
        } else if let Some(stroke) = shape.stroke {
            stroke_path(&mut layer, &pts, false, stroke_px, stroke);
        }
    }

    let mask = alpha_mask(&layer);
    (layer, mask)
}

/// Stroke width in pixels, scaled with the zoom factor.
///
/// The floor of one pixel keeps strokes visible at small target sizes
/// without growing disproportionately thick at large ones.
fn stroke_width_px(stroke_width: f32, scale: f32) -> f32 {
    ((stroke_width * scale / 40.0).trunc()).max(1.0)
}

/// Extract the alpha channel as a single-channel mask.
pub fn alpha_mask(layer: &RgbaImage) -> GrayImage {
    let mut mask = GrayImage::new(layer.width(), layer.height());
    for (x, y, px) in layer.enumerate_pixels() {
        mask.put_pixel(x, y, Luma([px.0[3]]));
    }
    mask
}

/// Even-odd scanline fill sampled at pixel centres.
fn fill_polygon(img: &mut RgbaImage, pts: &[(f32, f32)], colour: Colour) {
    if pts.len() < 3 {
        return;
    }

    let mut crossings: Vec<f32> = Vec::new();
    for y in 0..img.height() {
        let yc = y as f32 + 0.5;
        crossings.clear();

        for i in 0..pts.len() {
            let (x1, y1) = pts[i];
            let (x2, y2) = pts[(i + 1) % pts.len()];
            if (y1 <= yc && yc < y2) || (y2 <= yc && yc < y1) {
                crossings.push(x1 + (yc - y1) * (x2 - x1) / (y2 - y1));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil().max(0.0) as i64;
            let end = (pair[1] - 0.5).floor().min(img.width() as f32 - 1.0) as i64;
            for x in start..=end {
                blend_pixel(img, x as u32, y, colour);
            }
        }
    }
}

/// Stroke a point sequence with round-capped segments.
fn stroke_path(img: &mut RgbaImage, pts: &[(f32, f32)], closed: bool, width: f32, colour: Colour) {
    if pts.is_empty() {
        return;
    }
    if pts.len() == 1 {
        draw_segment(img, pts[0], pts[0], width, colour);
        return;
    }

    for pair in pts.windows(2) {
        draw_segment(img, pair[0], pair[1], width, colour);
    }
    if closed {
        draw_segment(img, pts[pts.len() - 1], pts[0], width, colour);
    }
}

/// Draw one thick segment by testing pixel centres against the
/// segment's distance field.
fn draw_segment(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, colour: Colour) {
    let half = width / 2.0;

    let min_x = (a.0.min(b.0) - half - 1.0).floor().max(0.0) as u32;
    let max_x = (a.0.max(b.0) + half + 1.0).ceil().min(img.width() as f32) as u32;
    let min_y = (a.1.min(b.1) - half - 1.0).floor().max(0.0) as u32;
    let max_y = (a.1.max(b.1) + half + 1.0).ceil().min(img.height() as f32) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let centre = (x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(centre, a, b) <= half {
                blend_pixel(img, x, y, colour);
            }
        }
    }
}

/// Distance from a point to a line segment.
fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (px, py) = p;
    let (ax, ay) = a;
    let (bx, by) = b;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fti;

    fn mask_count(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn test_empty_input_is_transparent() {
        let (layer, mask) = rasterize(&[], 32);
        assert!(layer.pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert_eq!(mask_count(&mask), 0);
    }

    #[test]
    fn test_shapes_without_points_are_discarded() {
        let shapes = vec![Shape::polygon(Some(Colour::WHITE))];
        let (_, mask) = rasterize(&shapes, 32);
        assert_eq!(mask_count(&mask), 0);
    }

    #[test]
    fn test_filled_square_covers_expected_area() {
        let src = "\
bgnpolygon();
vertex(0, 0);
vertex(100, 0);
vertex(100, 100);
vertex(0, 100);
endpolygon();
";
        let shapes = parse_fti(src);
        let (_, mask) = rasterize(&shapes, 64);

        // The square fills 0.72 of the canvas per side.
        let expected = (0.72f32 * 64.0).powi(2);
        let count = mask_count(&mask) as f32;
        assert!(
            (count - expected).abs() < expected * 0.1,
            "filled {} pixels, expected about {}",
            count,
            expected
        );
    }

    #[test]
    fn test_square_is_centred() {
        let src = "\
bgnpolygon();
vertex(0, 0);
vertex(100, 0);
vertex(100, 100);
vertex(0, 100);
endpolygon();
";
        let (_, mask) = rasterize(&parse_fti(src), 64);
        // Canvas centre is inside the square, corners are not.
        assert!(mask.get_pixel(32, 32).0[0] > 0);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(63, 63).0[0], 0);
    }

    #[test]
    fn test_vertical_axis_is_flipped() {
        // A triangle with its apex at the top of the source grid; after
        // the flip the apex must stay at the top of the image, so upper
        // rows hold fewer lit pixels than lower rows.
        let src = "\
bgnpolygon();
vertex(0, 0);
vertex(100, 0);
vertex(50, 100);
endpolygon();
";
        let (_, mask) = rasterize(&parse_fti(src), 64);

        let upper: usize = (0..32)
            .map(|y| (0..64).filter(|&x| mask.get_pixel(x, y).0[0] > 0).count())
            .sum();
        let lower: usize = (32..64)
            .map(|y| (0..64).filter(|&x| mask.get_pixel(x, y).0[0] > 0).count())
            .sum();
        assert!(upper < lower, "upper {} lower {}", upper, lower);
    }

    #[test]
    fn test_stroke_has_one_pixel_floor() {
        // At a tiny target size the scaled stroke width collapses; the
        // floor keeps the line visible.
        let src = "\
bgnline();
vertex(0, 50);
vertex(100, 50);
endline();
";
        let (_, mask) = rasterize(&parse_fti(src), 16);
        assert!(mask_count(&mask) > 0);
    }

    #[test]
    fn test_open_polyline_is_not_closed() {
        // An L of two segments must not gain a closing hypotenuse.
        let src = "\
bgnline();
vertex(0, 0);
vertex(0, 100);
vertex(100, 100);
endline();
";
        let (_, mask) = rasterize(&parse_fti(src), 64);
        // Midpoint of the would-be closing diagonal stays empty.
        assert_eq!(mask.get_pixel(32, 32).0[0], 0);
    }

    #[test]
    fn test_deterministic() {
        let src = "\
bgnpolygon();
vertex(0, 0);
vertex(100, 0);
vertex(50, 100);
endpolygon();
";
        let shapes = parse_fti(src);
        let (a, _) = rasterize(&shapes, 48);
        let (b, _) = rasterize(&shapes, 48);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
