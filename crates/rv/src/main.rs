//! RV CLI - OpenDocument to Re:VIEW converter.
//!
//! Usage: `rv <file.odt>`. Writes `<basename>.re` and extracts images to
//! the configured image directory.

mod convert;
mod error;
mod output;

use std::path::PathBuf;

use clap::Parser;
use rv_config::Config;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// RV - convert an OpenDocument text file to Re:VIEW markup.
#[derive(Parser)]
#[command(name = "rv", version, about)]
struct Cli {
    /// Input `.odt` document.
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // RUST_LOG controls verbosity, warnings only by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = Config::load(None)
        .map_err(CliError::from)
        .and_then(|config| convert::run(&cli.input, &config, &output));

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
