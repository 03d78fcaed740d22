//! Core data types for the icon pipeline.

mod colour;
mod shape;
mod spec;

pub use colour::{resolve_token, Colour, FALLBACK_GREY, ICON_COLOUR};
pub use shape::{Shape, ShapeKind};
pub use spec::{Appearance, BuiltinSpecs, IconSpec, Variant};
