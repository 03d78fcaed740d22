//! Generate command implementation.
//!
//! Selects an icon source, runs the pipeline and exports the complete
//! icon set with its manifest.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::{scan_sources, Source};
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{self, PipelineOptions, MASTER_SIZE};

/// Generate a macOS app icon set from IconSmith sources
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the AppIcon.appiconset directory to populate
    #[arg(long, short, default_value = "AppIcon.appiconset")]
    pub output: PathBuf,

    /// Rule file that composes multiple vector layers
    #[arg(long)]
    pub ftr: Option<PathBuf>,

    /// Vector file to render as the foreground
    #[arg(long)]
    pub fti: Option<PathBuf>,

    /// Pre-rasterized bitmap to use as the foreground
    #[arg(long)]
    pub bitmap: Option<PathBuf>,

    /// Specific TYPE block inside the rule file to render
    #[arg(long)]
    pub ftr_type: Option<String>,

    /// Render the opened state for icons with conditionals
    #[arg(long)]
    pub opened: bool,

    /// Directory to scan for sources when none is given explicitly
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Skip writing files that already exist
    #[arg(long)]
    pub no_overwrite: bool,

    /// Master render size in pixels
    #[arg(long, default_value_t = MASTER_SIZE)]
    pub master_size: u32,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let printer = Printer::new();

    let mut options = PipelineOptions {
        ftr: checked_source(&printer, args.ftr),
        fti: checked_source(&printer, args.fti),
        bitmap: checked_source(&printer, args.bitmap),
        ftr_type: args.ftr_type,
        opened: args.opened,
        master_size: args.master_size,
    };

    if options.ftr.is_none() && options.fti.is_none() && options.bitmap.is_none() {
        if let Some(root) = &args.source_root {
            match scan_sources(root).preferred() {
                Some(Source::Rules(path)) => {
                    printer.info("Discovered", &display_path(&path));
                    options.ftr = Some(path);
                }
                Some(Source::Vector(path)) => {
                    printer.info("Discovered", &display_path(&path));
                    options.fti = Some(path);
                }
                Some(Source::Bitmap(path)) => {
                    printer.info("Discovered", &display_path(&path));
                    options.bitmap = Some(path);
                }
                None => {}
            }
        }
    }

    if let Some(source) = options
        .ftr
        .as_ref()
        .or(options.fti.as_ref())
        .or(options.bitmap.as_ref())
    {
        printer.status(
            "Rendering",
            &format!("{} ({}px master)", display_path(source), options.master_size),
        );
    }

    let summary = pipeline::run(&options, &args.output, !args.no_overwrite)?;

    let mut message = format!(
        "{} to {}",
        plural(summary.written, "icon", "icons"),
        display_path(&args.output)
    );
    if summary.skipped > 0 {
        message.push_str(&format!(" ({} skipped)", summary.skipped));
    }
    printer.status("Exported", &message);

    Ok(())
}

/// Drop a source path the user supplied but which does not exist,
/// with a warning, so the pipeline can fall through to other sources.
fn checked_source(printer: &Printer, path: Option<PathBuf>) -> Option<PathBuf> {
    match path {
        Some(p) if !p.exists() => {
            printer.warning("Missing", &display_path(&p));
            None
        }
        other => other,
    }
}
