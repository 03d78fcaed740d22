pub mod completions;
pub mod generate;
pub mod resolve;

use clap::{Parser, Subcommand};

/// iconsmith - IRIX IconSmith icon set generator
#[derive(Parser, Debug)]
#[command(name = "iconsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a macOS app icon set from IconSmith sources
    Generate(generate::GenerateArgs),

    /// Resolve a rule file and print the vector files it composes
    Resolve(resolve::ResolveArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
