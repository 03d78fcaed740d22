use clap::Parser;
use iconsmith::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => iconsmith::cli::generate::run(args)?,
        Commands::Resolve(args) => iconsmith::cli::resolve::run(args)?,
        Commands::Completions(args) => iconsmith::cli::completions::run(args)?,
    }

    Ok(())
}
