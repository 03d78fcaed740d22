//! Parser for IconSmith `.fti` vector files.
//!
//! The format is line-oriented: one instruction per line, case-sensitive
//! keywords, with begin/end pairs bracketing primitive definitions and a
//! single fill colour that persists across primitives. Source files from
//! real IRIX installations carry directives outside the supported
//! primitive set, so anything unrecognized is skipped rather than
//! rejected.

use crate::types::{resolve_token, Colour, Shape, ICON_COLOUR};

/// Parse the raw text of one `.fti` file into an ordered shape sequence.
///
/// Every matched begin/end pair yields exactly one shape, in end order.
/// Begins left unmatched at end of input are dropped. Blank lines,
/// comments (leading `#`) and unrecognized or malformed instructions
/// are skipped silently.
pub fn parse_fti(text: &str) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = Vec::new();
    let mut stack: Vec<Shape> = Vec::new();
    let mut current_colour = ICON_COLOUR;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(token) = call_argument(line, "color") {
            current_colour = resolve_token(token, Some(current_colour));
            continue;
        }

        // Keyword order matters only for readability; none of the
        // begin/end keywords is a prefix of another.
        if line.starts_with("bgnpolygon") {
            stack.push(Shape::polygon(Some(current_colour)));
            continue;
        }
        if line.starts_with("bgnoutlinepolygon") {
            // Stroke colour arrives with the matching end instruction.
            let mut shape = Shape::polygon(Some(current_colour));
            shape.stroke_width = 1.2;
            stack.push(shape);
            continue;
        }
        if line.starts_with("bgnline") {
            stack.push(Shape::polyline(Some(current_colour), 1.5, false));
            continue;
        }
        if line.starts_with("bgnclosedline") {
            stack.push(Shape::polyline(Some(current_colour), 1.5, true));
            continue;
        }
        if line.starts_with("bgnpoint") {
            stack.push(Shape::polygon(Some(current_colour)));
            continue;
        }

        if let Some(args) = call_argument(line, "vertex") {
            // A vertex outside any open shape is ignored, not an error.
            if let (Some(shape), Some((x, y))) = (stack.last_mut(), parse_pair(args)) {
                shape.points.push((x, y));
            }
            continue;
        }

        if let Some(token) = call_argument(line, "endoutlinepolygon") {
            if let Some(mut shape) = stack.pop() {
                let mut stroke = resolve_token(token, Some(Colour::BLACK));
                // An outline matching its own fill would be invisible;
                // legacy assets rely on it snapping to black.
                if Some(stroke) == shape.fill {
                    stroke = Colour::BLACK;
                }
                shape.stroke = Some(stroke);
                shapes.push(shape);
            }
            continue;
        }

        if line.starts_with("endpolygon")
            || line.starts_with("endline")
            || line.starts_with("endclosedline")
            || line.starts_with("endpoint")
        {
            if let Some(shape) = stack.pop() {
                shapes.push(shape);
            }
            continue;
        }
    }

    shapes
}

/// Extract the argument list of a leading `keyword(...)` call.
///
/// Returns the text between the parentheses, or `None` when the line
/// does not start with the keyword or has no closing parenthesis.
fn call_argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let close = rest.find(')')?;
    Some(&rest[..close])
}

/// Parse a `x, y` coordinate pair.
fn parse_pair(args: &str) -> Option<(f32, f32)> {
    let (x, y) = args.split_once(',')?;
    let x: f32 = x.trim().parse().ok()?;
    let y: f32 = y.trim().parse().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    const SQUARE: &str = "\
color(iconcolor);
bgnpolygon();
vertex(0, 0);
vertex(10, 0);
vertex(10, 10);
vertex(0, 10);
endpolygon();
";

    #[test]
    fn test_single_polygon() {
        let shapes = parse_fti(SQUARE);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].kind, ShapeKind::Polygon);
        assert_eq!(shapes[0].points.len(), 4);
        assert_eq!(shapes[0].fill, Some(ICON_COLOUR));
        assert!(shapes[0].closed);
    }

    #[test]
    fn test_shape_count_matches_pairs() {
        let src = "\
bgnpolygon();
vertex(0, 0);
endpolygon();
bgnline();
vertex(1, 1);
vertex(2, 2);
endline();
bgnclosedline();
vertex(3, 3);
endclosedline();
";
        assert_eq!(parse_fti(src).len(), 3);
    }

    #[test]
    fn test_unmatched_begin_dropped() {
        let src = "bgnpolygon();\nvertex(0, 0);\n";
        assert!(parse_fti(src).is_empty());
    }

    #[test]
    fn test_vertex_outside_shape_ignored() {
        let src = "vertex(5, 5);\nbgnpolygon();\nvertex(0, 0);\nendpolygon();\n";
        let shapes = parse_fti(src);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].points, vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_comments_and_unknown_lines_skipped() {
        let src = "\
# IconSmith header
fticolorramp(1, 2);

bgnpolygon();
vertex(0, 0);
garbage garbage
endpolygon();
";
        assert_eq!(parse_fti(src).len(), 1);
    }

    #[test]
    fn test_colour_persists_across_primitives() {
        let src = "\
color(-1);
bgnpolygon();
vertex(0, 0);
endpolygon();
bgnpolygon();
vertex(1, 1);
endpolygon();
";
        let shapes = parse_fti(src);
        let expected = Colour::rgb(0xf7, 0xf8, 0xfc);
        assert_eq!(shapes[0].fill, Some(expected));
        assert_eq!(shapes[1].fill, Some(expected));
    }

    #[test]
    fn test_line_takes_current_colour_as_stroke() {
        let src = "\
color(outlinecolor);
bgnline();
vertex(0, 0);
vertex(5, 5);
endline();
";
        let shapes = parse_fti(src);
        assert_eq!(shapes[0].kind, ShapeKind::Polyline);
        assert_eq!(shapes[0].stroke, Some(Colour::BLACK));
        assert_eq!(shapes[0].stroke_width, 1.5);
        assert!(!shapes[0].closed);
        assert!(shapes[0].fill.is_none());
    }

    #[test]
    fn test_outline_polygon_resolves_stroke_at_end() {
        let src = "\
color(iconcolor);
bgnoutlinepolygon();
vertex(0, 0);
vertex(4, 0);
vertex(4, 4);
endoutlinepolygon(outlinecolor);
";
        let shapes = parse_fti(src);
        assert_eq!(shapes[0].stroke, Some(Colour::BLACK));
        assert_eq!(shapes[0].stroke_width, 1.2);
        assert_eq!(shapes[0].fill, Some(ICON_COLOUR));
    }

    #[test]
    fn test_outline_matching_fill_forced_black() {
        let src = "\
color(iconcolor);
bgnoutlinepolygon();
vertex(0, 0);
vertex(4, 4);
endoutlinepolygon(iconcolor);
";
        let shapes = parse_fti(src);
        // Stroke would equal the fill; it snaps to black instead.
        assert_eq!(shapes[0].stroke, Some(Colour::BLACK));
    }

    #[test]
    fn test_nested_begin_pops_innermost() {
        let src = "\
color(-1);
bgnpolygon();
vertex(0, 0);
color(-85);
bgnpolygon();
vertex(1, 1);
endpolygon();
endpolygon();
";
        let shapes = parse_fti(src);
        assert_eq!(shapes.len(), 2);
        // Inner shape ends first and carries the later colour.
        assert_eq!(shapes[0].fill, Some(Colour::rgb(0x42, 0x54, 0x8f)));
        assert_eq!(shapes[0].points, vec![(1.0, 1.0)]);
        assert_eq!(shapes[1].points, vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_fractional_vertices() {
        let src = "bgnpolygon();\nvertex(0.5, 99.25);\nendpolygon();\n";
        let shapes = parse_fti(src);
        assert_eq!(shapes[0].points, vec![(0.5, 99.25)]);
    }
}
