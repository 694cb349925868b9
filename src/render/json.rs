//! JSON rendering for analysis reports.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Report;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any value in the given layout. Non-ASCII text is kept as is.
pub fn to_json_value<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a report to JSON.
pub fn to_json(report: &Report, format: JsonFormat) -> Result<String> {
    to_json_value(report, format)
}

/// Write a report to `path`, replacing any existing file.
pub fn write_report<P: AsRef<Path>>(report: &Report, path: P, format: JsonFormat) -> Result<()> {
    let json = to_json(report, format)?;
    std::fs::write(path, json)?;
    Ok(())
}
