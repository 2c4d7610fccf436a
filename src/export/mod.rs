//! Report output.
//!
//! Analysis results render either as machine-readable JSON or as a
//! human-readable text summary.

pub mod json;
pub mod text;

use std::path::Path;
use thiserror::Error;

use crate::report::BatteryReport;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Supported report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Write a report to `path` in the requested format.
pub fn export_report(
    report: &BatteryReport,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => json::write_report(report, path),
        ExportFormat::Text => text::write_report(report, path),
    }?;
    tracing::info!(path = %path.display(), ?format, "report exported");
    Ok(())
}
