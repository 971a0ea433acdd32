//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for dips using clap's derive API.
//!
//! # Commands
//!
//! - `order`: Print an order in which every dependency precedes its dependents
//! - `check`: Validate a manifest without printing the order
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! dips order deps.json
//! dips order deps.yaml --entity build,test,deploy
//! cat deps.json | dips --json order -
//! dips check deps.json
//! ```

use crate::error::ResolveError;
use crate::manifest::Manifest;
use crate::output::{self, CheckSummary, OutputConfig, OutputMode};
use crate::resolver::TopologicalResolver;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Dips - resolve a valid execution order for dependent entities
///
/// Reads entities and a "depends-on" map from a manifest and prints an
/// order in which every entity comes after everything it depends on.
#[derive(Parser, Debug)]
#[command(name = "dips")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the resolved order
    ///
    /// Lists every entity such that each one appears after all entities it
    /// depends on, directly or transitively.
    Order(ManifestArgs),

    /// Validate a manifest
    ///
    /// Checks for unknown entities and circular dependencies. Exits with a
    /// non-zero status if no valid order exists.
    Check(ManifestArgs),
}

/// Manifest input shared by all commands
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Manifest file (.json, .yaml or .yml), or `-` to read JSON from stdin
    pub manifest: PathBuf,

    /// Entities to order, overriding the manifest (comma-separated or repeated)
    ///
    /// Every entity named in the manifest's dependency map must be included.
    #[arg(short, long = "entity", value_delimiter = ',')]
    pub entities: Vec<String>,
}

impl ManifestArgs {
    /// Load the manifest and apply the entity override.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn load(&self) -> Result<Manifest> {
        let manifest = if self.manifest.as_os_str() == "-" {
            Manifest::from_reader_json(std::io::stdin().lock())
                .context("Failed to read manifest from stdin")?
        } else {
            Manifest::from_path(&self.manifest).with_context(|| {
                format!("Failed to load manifest {}", self.manifest.display())
            })?
        };

        if self.entities.is_empty() {
            Ok(manifest)
        } else {
            Ok(manifest.with_entities(self.entities.clone()))
        }
    }
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded, if `order` cannot
    /// resolve it, or if writing the output fails.
    pub fn execute(&self) -> Result<ExitCode> {
        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let config = OutputConfig::from_env();

        match &self.command {
            Some(Commands::Order(args)) => execute_order(args, output_mode, &config),
            Some(Commands::Check(args)) => execute_check(args, output_mode, &config),
            None => {
                println!("Dips dependency resolver");
                println!("Use --help for more information");
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Execute the order command
fn execute_order(args: &ManifestArgs, mode: OutputMode, config: &OutputConfig) -> Result<ExitCode> {
    let manifest = args.load()?;
    let order = manifest
        .resolve(&TopologicalResolver)
        .context("Failed to resolve dependency order")?;

    output::print_order(&order, mode, config)?;
    Ok(ExitCode::SUCCESS)
}

/// Execute the check command
fn execute_check(args: &ManifestArgs, mode: OutputMode, config: &OutputConfig) -> Result<ExitCode> {
    let manifest = args.load()?;
    let result = manifest.resolve(&TopologicalResolver);

    let error = result.as_ref().err();
    let summary = CheckSummary {
        entities: manifest.entities().len(),
        dependencies: manifest.dependency_count(),
        error: error.map(ResolveError::to_string),
        cycle: error.and_then(ResolveError::cycle),
    };
    output::print_check(&summary, mode, config)?;

    if result.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::debug!(error = ?summary.error, "Manifest check failed");
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["dips"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_order() {
        let cli = Cli::try_parse_from(["dips", "order", "deps.json"]).unwrap();
        match cli.command {
            Some(Commands::Order(args)) => {
                assert_eq!(args.manifest, PathBuf::from("deps.json"));
                assert!(args.entities.is_empty());
            }
            _ => panic!("Expected Order command"),
        }
    }

    #[test]
    fn test_parse_global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["dips", "check", "deps.yaml", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Check(_))));
    }

    #[test]
    fn test_parse_entities_comma_separated_and_repeated() {
        let cli =
            Cli::try_parse_from(["dips", "order", "-", "--entity", "a,b", "-e", "c"]).unwrap();
        match cli.command {
            Some(Commands::Order(args)) => {
                assert_eq!(args.manifest, PathBuf::from("-"));
                assert_eq!(args.entities, vec!["a", "b", "c"]);
            }
            _ => panic!("Expected Order command"),
        }
    }

    #[test]
    fn test_parse_order_requires_manifest() {
        assert!(Cli::try_parse_from(["dips", "order"]).is_err());
    }
}
