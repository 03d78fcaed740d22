//! File system discovery of icon sources.
//!
//! When no explicit source is given, a source root (typically a mounted
//! IRIX filesystem's `/usr/lib/filetype` tree) can be scanned for
//! candidates instead. Rule files compose complete icons, so they beat
//! single vector files, which in turn beat raw bitmaps.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Result of scanning a source root for icon sources.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered `.ftr` rule files.
    pub rules: Vec<PathBuf>,
    /// Discovered `.fti` vector files.
    pub vectors: Vec<PathBuf>,
    /// Discovered `.icon` bitmap files.
    pub bitmaps: Vec<PathBuf>,
}

impl ScanResult {
    /// Get the total number of discovered files.
    pub fn total(&self) -> usize {
        self.rules.len() + self.vectors.len() + self.bitmaps.len()
    }

    /// Check if no files were discovered.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The best candidate to render by default: the first rule file,
    /// else the first vector file, else the first bitmap.
    pub fn preferred(&self) -> Option<Source> {
        if let Some(path) = self.rules.first() {
            return Some(Source::Rules(path.clone()));
        }
        if let Some(path) = self.vectors.first() {
            return Some(Source::Vector(path.clone()));
        }
        self.bitmaps.first().map(|p| Source::Bitmap(p.clone()))
    }
}

/// One discovered source, tagged with how the pipeline should use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Rules(PathBuf),
    Vector(PathBuf),
    Bitmap(PathBuf),
}

/// Recursively scan a directory for icon sources.
///
/// Files are categorized by extension and returned in stable sorted
/// order so repeated scans pick the same defaults.
pub fn scan_sources(root: &Path) -> ScanResult {
    let mut result = ScanResult::default();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("ftr") => result.rules.push(path.to_path_buf()),
            Some("fti") => result.vectors.push(path.to_path_buf()),
            Some("icon") => result.bitmaps.push(path.to_path_buf()),
            _ => {}
        }
    }

    result.rules.sort();
    result.vectors.sort();
    result.bitmaps.sort();
    result
}
