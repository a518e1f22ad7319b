//! gistembed CLI - Gist embedding for rendered HTML.
//!
//! Provides commands for:
//! - `process`: Replace gist markers in HTML files
//! - `css`: Print the highlight stylesheet
//! - `cache-path`: Print the cache file location for a gist

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CachePathArgs, CssArgs, ProcessArgs};
use output::Output;

/// gistembed - Embed GitHub Gists in rendered HTML.
#[derive(Parser)]
#[command(name = "gistembed", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replace gist markers in HTML files.
    Process(ProcessArgs),
    /// Print the stylesheet for highlighted code.
    Css(CssArgs),
    /// Print the cache file path for a gist.
    CachePath(CachePathArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for process command
    let verbose = matches!(&cli.command, Commands::Process(args) if args.verbose);

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Css(args) => args.execute(),
        Commands::CachePath(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
