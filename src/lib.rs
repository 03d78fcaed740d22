//! iconsmith - IRIX IconSmith icon set generator
//!
//! A library for rendering legacy SGI icon sources (IconSmith `.fti`
//! vector files, `.ftr` rule files and classic `.icon` bitmaps) into a
//! complete, appearance-aware macOS `AppIcon.appiconset`.
//!
//! The pipeline runs resolver → parser → rasterizer → compositor →
//! variant deriver → exporter; see [`pipeline`] for the orchestration.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod types;

pub use discovery::{scan_sources, ScanResult, Source};
pub use error::{IconError, Result};
pub use parser::{parse_fti, resolve_ftr, GuardExpr, RuleNode};
pub use pipeline::{create_master, PipelineOptions, MASTER_SIZE};
pub use render::{
    background, compose_layer, derive_variants, export_assets, place_bitmap, rasterize,
    rasterize_with_fit, ExportSummary, VariantSet, DEFAULT_FIT,
};
pub use types::{
    resolve_token, Appearance, BuiltinSpecs, Colour, IconSpec, Shape, ShapeKind, Variant,
};
