//! JSON output formatting for breathe.

use serde::Serialize;
use serde_json::json;

use crate::error::BreatheError;
use crate::output::DurationReport;
use crate::technique::Catalog;

/// Format the technique list as JSON
///
/// Each item carries its default duration alongside the definition.
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_techniques_json(catalog: &Catalog) -> Result<String, BreatheError> {
    let items: Vec<_> = catalog
        .iter()
        .map(|t| {
            let report = DurationReport::new(t, i64::from(t.cycles));
            json!({
                "id": t.id,
                "name": t.name,
                "ratio": t.ratio,
                "cycles": t.cycles,
                "duration": report.duration,
                "total_seconds": report.total_seconds,
                "steps": t.steps,
            })
        })
        .collect();

    let output = json!({
        "count": catalog.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, BreatheError> {
    Ok(serde_json::to_string_pretty(value)?)
}
