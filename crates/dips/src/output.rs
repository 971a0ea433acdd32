//! Output formatting for CLI commands.
//!
//! Results are rendered either as human-readable text or as JSON for
//! programmatic use.

use colored::Colorize;
use serde::Serialize;
use std::env;
use std::ffi::OsStr;
use std::fmt::Display;
use std::io::{self, Write};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any non-empty value disables colors)
    /// - `DIPS_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let no_color = env::var_os("NO_COLOR");
        let dips_color = env::var("DIPS_COLOR").ok();
        Self::from_env_values(no_color.as_deref(), dips_color.as_deref())
    }

    /// Create an `OutputConfig` from the values of `NO_COLOR` and
    /// `DIPS_COLOR`, `None` meaning unset.
    ///
    /// An unrecognized `DIPS_COLOR` is logged and leaves colors on.
    #[must_use]
    pub fn from_env_values(no_color: Option<&OsStr>, dips_color: Option<&str>) -> Self {
        let no_color = no_color.is_some_and(|v| !v.is_empty());
        let dips_color = match dips_color {
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => false,
            Some(v) if v.is_empty() || v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) => {
                tracing::warn!(
                    env_var = "DIPS_COLOR",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                true
            }
            None => true,
        };

        Self {
            use_colors: !no_color && dips_color,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

#[derive(Serialize)]
struct OrderReport<'a> {
    order: &'a [String],
}

#[derive(Serialize)]
struct CheckReport<'a> {
    valid: bool,
    entities: usize,
    dependencies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<&'a [String]>,
}

/// Outcome of validating a manifest, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary<'a> {
    /// Number of entities considered.
    pub entities: usize,
    /// Number of declared dependency edges.
    pub dependencies: usize,
    /// Error message when the manifest cannot be resolved.
    pub error: Option<String>,
    /// Offending cycle, if the failure was a circular dependency.
    pub cycle: Option<&'a [String]>,
}

/// Print a resolved order in the specified format.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_order(order: &[String], mode: OutputMode, config: &OutputConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_order(&mut handle, order, mode, config)
}

/// Write a resolved order in the specified format.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn write_order<W: Write>(
    w: &mut W,
    order: &[String],
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => write_order_text(w, order, config),
        OutputMode::Json => write_json(w, &OrderReport { order }),
    }
}

/// Print a validation summary in the specified format.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_check(
    summary: &CheckSummary<'_>,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_check(&mut handle, summary, mode, config)
}

/// Write a validation summary in the specified format.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn write_check<W: Write>(
    w: &mut W,
    summary: &CheckSummary<'_>,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => write_check_text(w, summary, config),
        OutputMode::Json => write_json(
            w,
            &CheckReport {
                valid: summary.error.is_none(),
                entities: summary.entities,
                dependencies: summary.dependencies,
                error: summary.error.clone(),
                cycle: summary.cycle,
            },
        ),
    }
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn paint<T: Display>(text: T, config: &OutputConfig, style: fn(String) -> String) -> String {
    let text = text.to_string();
    if config.use_colors { style(text) } else { text }
}

fn write_order_text<W: Write>(w: &mut W, order: &[String], config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{} ({} entities):",
        paint("Resolved order", config, |t| t.bold().to_string()),
        order.len()
    )?;

    let width = order.len().to_string().len();
    for (i, entity) in order.iter().enumerate() {
        writeln!(
            w,
            "  {} {}",
            paint(format!("{:>width$}.", i + 1), config, |t| t.dimmed().to_string()),
            paint(entity, config, |t| t.cyan().to_string())
        )?;
    }

    Ok(())
}

fn write_check_text<W: Write>(
    w: &mut W,
    summary: &CheckSummary<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    match &summary.error {
        None => writeln!(
            w,
            "{} {} entities, {} dependencies",
            paint("ok:", config, |t| t.green().to_string()),
            summary.entities,
            summary.dependencies
        ),
        Some(error) => {
            writeln!(w, "{} {error}", paint("error:", config, |t| t.red().to_string()))?;
            if let Some(cycle) = summary.cycle {
                writeln!(
                    w,
                    "  {} {}",
                    paint("cycle:", config, |t| t.dimmed().to_string()),
                    cycle.join(" -> ")
                )?;
            }
            Ok(())
        }
    }
}
