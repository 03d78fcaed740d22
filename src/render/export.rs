//! Asset export: resized variant images plus the `Contents.json`
//! manifest.
//!
//! Export is driven entirely by the static spec table. Images are
//! written first; the manifest is written last so a failed image write
//! never leaves a manifest describing files that do not exist.

use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use serde::Serialize;

use crate::error::{IconError, Result};
use crate::render::variant::VariantSet;
use crate::types::{Appearance, IconSpec};

/// One manifest row, serialized in Xcode's field order.
#[derive(Debug, Serialize)]
struct ManifestImage {
    idiom: String,
    size: String,
    scale: String,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    appearances: Vec<Appearance>,
}

impl ManifestImage {
    fn from_spec(spec: &IconSpec) -> Self {
        Self {
            idiom: spec.idiom.clone(),
            size: format!("{0}x{0}", spec.size),
            scale: format!("{}x", spec.scale),
            filename: spec.filename.clone(),
            platform: spec.platform.clone(),
            appearances: spec.appearances.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ManifestInfo {
    author: &'static str,
    version: u32,
}

#[derive(Debug, Serialize)]
struct Manifest {
    images: Vec<ManifestImage>,
    info: ManifestInfo,
}

/// Outcome counts for one export run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Export every spec row into `output_dir` and write the manifest.
///
/// Each row selects its variant, is resized with Lanczos resampling to
/// `size * scale`, and lands under the row's filename. With `overwrite`
/// unset, rows whose file already exists are skipped without error, so
/// repeated runs are incremental.
pub fn export_assets(
    output_dir: &Path,
    variants: &VariantSet,
    specs: &[IconSpec],
    overwrite: bool,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir).map_err(|e| IconError::Io {
        path: output_dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut summary = ExportSummary::default();

    for spec in specs {
        let path = output_dir.join(&spec.filename);
        if !overwrite && path.exists() {
            summary.skipped += 1;
            continue;
        }

        let source = variants.get(spec.variant());
        let pixel_size = spec.pixel_size();
        let resized = imageops::resize(source, pixel_size, pixel_size, FilterType::Lanczos3);

        resized.save(&path).map_err(|e| IconError::Image {
            path: path.clone(),
            message: format!("Failed to write PNG: {}", e),
        })?;
        summary.written += 1;
    }

    write_manifest(output_dir, specs)?;
    Ok(summary)
}

/// Write `Contents.json` for the spec table.
fn write_manifest(output_dir: &Path, specs: &[IconSpec]) -> Result<()> {
    let manifest = Manifest {
        images: specs.iter().map(ManifestImage::from_spec).collect(),
        info: ManifestInfo {
            author: "iconsmith",
            version: 1,
        },
    };

    let json = serde_json::to_string_pretty(&manifest).map_err(|e| IconError::Parse {
        message: format!("Failed to serialize manifest: {}", e),
        help: None,
    })?;

    let path = output_dir.join("Contents.json");
    fs::write(&path, json + "\n").map_err(|e| IconError::Io {
        path,
        message: format!("Failed to write manifest: {}", e),
    })?;

    Ok(())
}
