//! Dips CLI binary.

use anyhow::Result;
use dips::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Main entry point for the dips CLI.
fn main() -> Result<ExitCode> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=dips=debug,dips_graph=trace dips order deps.json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dips=info,dips_graph=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting dips CLI");

    let cli = Cli::parse_args();
    let code = cli.execute()?;

    tracing::debug!("Dips CLI completed");
    Ok(code)
}
