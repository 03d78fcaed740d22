//! Parsers for the legacy IconSmith source formats.
//!
//! Two formats feed the pipeline:
//! - `.fti` vector files: line-oriented drawing instructions, parsed
//!   into [`crate::types::Shape`] sequences by [`fti`].
//! - `.ftr` rule files: brace-delimited documents that compose several
//!   vector files into one icon per type and open/closed state,
//!   resolved by [`ftr`].

pub mod fti;
pub mod ftr;

pub use fti::parse_fti;
pub use ftr::{resolve_ftr, GuardExpr, RuleNode};
