//! docnav CLI - Documentation navigation validator.
//!
//! Provides commands for:
//! - `check`: Validate navigation against the content documents
//! - `build`: Validate and write the resolved site manifest
//! - `pages`: List content documents with their metadata

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, PagesArgs};
use output::Output;

/// docnav - Documentation navigation validator.
#[derive(Parser)]
#[command(name = "docnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate navigation and report every problem found.
    Check(CheckArgs),
    /// Validate navigation and write the resolved site manifest.
    Build(BuildArgs),
    /// List content documents.
    Pages(PagesArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.site.verbose,
            Self::Build(args) => args.site.verbose,
            Self::Pages(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Pages(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(format_args!("Error: {err}"));
        std::process::exit(1);
    }
}
