//! Command implementations for breathe.
//!
//! This module contains the implementation of all CLI commands.

mod run;

pub use run::{run, RunSummary};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::{Cli, OutputFormat};
use crate::error::BreatheError;
use crate::output::{format_duration_report, format_technique, format_techniques, DurationReport};
use crate::technique::Catalog;

/// Execute list command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn list(catalog: &Catalog, format: OutputFormat) -> Result<String, BreatheError> {
    format_techniques(catalog, format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `BreatheError::NotFound` for an unknown id.
pub fn show(catalog: &Catalog, id: &str, format: OutputFormat) -> Result<String, BreatheError> {
    let technique = catalog
        .get(id)
        .ok_or_else(|| BreatheError::NotFound(id.to_string()))?;
    format_technique(technique, format)
}

/// Execute duration command
///
/// # Errors
///
/// Returns `BreatheError::NotFound` for an unknown id.
pub fn duration(
    catalog: &Catalog,
    id: &str,
    cycles: Option<i64>,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let technique = catalog
        .get(id)
        .ok_or_else(|| BreatheError::NotFound(id.to_string()))?;
    let report = DurationReport::new(technique, cycles.unwrap_or_else(|| i64::from(technique.cycles)));
    format_duration_report(&report, format)
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, BreatheError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "breathe", &mut buf);
    String::from_utf8(buf).map_err(|e| BreatheError::Config(format!("UTF-8 error: {e}")))
}
