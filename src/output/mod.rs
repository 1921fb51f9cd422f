//! Output formatting for breathe.
//!
//! This module provides formatters for displaying techniques and session
//! results in various formats.

mod json;
mod pretty;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::BreatheError;
use crate::technique::{format_duration, Catalog, Technique};

pub use json::*;
pub use pretty::*;

/// How long a technique runs for a given cycle count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    /// Technique id.
    pub id: String,
    /// Technique name.
    pub name: String,
    /// Cycle count, at least one.
    pub cycles: u32,
    /// Total length in seconds.
    pub total_seconds: f64,
    /// Total length as `MM:SS`.
    pub duration: String,
}

impl DurationReport {
    /// Build a report; `cycles` below one count as one.
    #[must_use]
    pub fn new(technique: &Technique, cycles: i64) -> Self {
        let cycles = u32::try_from(cycles.max(1)).unwrap_or(u32::MAX);
        let total_seconds = technique.total_seconds(cycles);
        Self {
            id: technique.id.clone(),
            name: technique.name.clone(),
            cycles,
            total_seconds,
            duration: format_duration(total_seconds),
        }
    }
}

/// Format the technique list based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_techniques(catalog: &Catalog, format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_techniques_pretty(catalog)),
        OutputFormat::Json => format_techniques_json(catalog),
    }
}

/// Format a single technique based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_technique(technique: &Technique, format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_technique_pretty(technique)),
        OutputFormat::Json => to_json(technique),
    }
}

/// Format a duration report based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_duration_report(
    report: &DurationReport,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_duration_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}
