//! End-to-end icon generation: source selection through export.
//!
//! One run is a pure function of its inputs plus filesystem writes at
//! the very end. Sources are tried in a fixed order: rule file, then
//! vector file, then bitmap. Only non-existence moves on to the next
//! source; a rule file that resolves to zero shapes still wins and
//! produces background-only icons.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, RgbaImage};

use crate::error::{IconError, Result};
use crate::parser::{parse_fti, resolve_ftr};
use crate::render::{
    background, compose_layer, derive_variants, export_assets, place_bitmap, rasterize,
    ExportSummary,
};
use crate::types::{BuiltinSpecs, Shape};

/// Default master render size; every exported image derives from it.
pub const MASTER_SIZE: u32 = 1024;

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Rule file composing several vector layers.
    pub ftr: Option<PathBuf>,
    /// Single vector file.
    pub fti: Option<PathBuf>,
    /// Pre-rasterized bitmap foreground.
    pub bitmap: Option<PathBuf>,
    /// `TYPE` block to select inside the rule file.
    pub ftr_type: Option<String>,
    /// Render the opened state for icons with conditionals.
    pub opened: bool,
    /// Master render size in pixels.
    pub master_size: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ftr: None,
            fti: None,
            bitmap: None,
            ftr_type: None,
            opened: false,
            master_size: MASTER_SIZE,
        }
    }
}

/// Compose the master image and its foreground mask.
pub fn create_master(options: &PipelineOptions) -> Result<(RgbaImage, GrayImage)> {
    let size = options.master_size;
    let backdrop = background(size);

    if let Some(ftr_path) = existing(&options.ftr) {
        let shapes = shapes_from_rules(ftr_path, options.ftr_type.as_deref(), options.opened)?;
        let (layer, mask) = rasterize(&shapes, size);
        let composed = compose_layer(&backdrop, &layer, &mask);
        return Ok((composed, mask));
    }

    if let Some(fti_path) = existing(&options.fti) {
        let text = read_source(fti_path)?;
        let shapes = parse_fti(&text);
        let (layer, mask) = rasterize(&shapes, size);
        let composed = compose_layer(&backdrop, &layer, &mask);
        return Ok((composed, mask));
    }

    if let Some(bitmap_path) = existing(&options.bitmap) {
        let bitmap = load_bitmap(bitmap_path)?;
        let (composed, mask) = place_bitmap(&backdrop, &bitmap);
        return Ok((composed, mask));
    }

    Err(IconError::MissingSource {
        help: Some("Provide a rule file (--ftr), a vector file (--fti) or a bitmap (--bitmap)".to_string()),
    })
}

/// Run the full pipeline and export the icon set.
pub fn run(options: &PipelineOptions, output_dir: &Path, overwrite: bool) -> Result<ExportSummary> {
    let (master, mask) = create_master(options)?;
    let variants = derive_variants(&master, &mask);
    export_assets(output_dir, &variants, &BuiltinSpecs::all(), overwrite)
}

/// Resolve a rule file into the union of its referenced shapes.
///
/// Include paths are relative to the rule file's directory; references
/// that do not exist on disk are skipped, keeping partial icon stacks
/// renderable.
pub fn shapes_from_rules(ftr_path: &Path, ftr_type: Option<&str>, opened: bool) -> Result<Vec<Shape>> {
    let text = read_source(ftr_path)?;
    let includes = resolve_ftr(&text, ftr_type, opened);
    let base = ftr_path.parent().unwrap_or_else(|| Path::new("."));

    let mut shapes = Vec::new();
    for include in includes {
        let target = base.join(&include);
        if !target.exists() {
            continue;
        }
        let text = read_source(&target)?;
        shapes.extend(parse_fti(&text));
    }
    Ok(shapes)
}

/// Load a bitmap foreground as RGBA.
pub fn load_bitmap(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| IconError::Image {
        path: path.to_path_buf(),
        message: format!("Failed to decode bitmap: {}", e),
    })?;
    Ok(img.to_rgba8())
}

fn existing(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| p.exists())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| IconError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read source: {}", e),
    })
}
