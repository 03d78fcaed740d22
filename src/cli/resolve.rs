//! Resolve command implementation.
//!
//! Runs the rule-file resolver on its own and prints the resulting
//! include list to stdout, one path per line. Useful for checking what
//! a given type and open/closed state would compose before rendering.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{IconError, Result};
use crate::parser::resolve_ftr;

/// Resolve a rule file and print the vector files it composes
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Rule file to resolve
    pub ftr: PathBuf,

    /// Specific TYPE block inside the rule file to resolve
    #[arg(long)]
    pub ftr_type: Option<String>,

    /// Resolve the opened state for icons with conditionals
    #[arg(long)]
    pub opened: bool,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let text = fs::read_to_string(&args.ftr).map_err(|e| IconError::Io {
        path: args.ftr.clone(),
        message: format!("Failed to read rule file: {}", e),
    })?;

    for include in resolve_ftr(&text, args.ftr_type.as_deref(), args.opened) {
        println!("{}", include);
    }

    Ok(())
}
