//! Rendering pipeline: rasterization, composition, variants, export.

pub mod background;
mod blend;
pub mod compose;
pub mod export;
pub mod raster;
pub mod variant;

pub use background::background;
pub use compose::{compose_layer, place_bitmap};
pub use export::{export_assets, ExportSummary};
pub use raster::{rasterize, rasterize_with_fit, DEFAULT_FIT};
pub use variant::{derive_variants, VariantSet};
