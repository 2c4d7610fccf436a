//! Battery record ingestion.
//!
//! Two on-disk layouts are supported: a single JSON document holding the
//! full record set, and a CSV pair (`<base>_cycles.csv` plus an optional
//! `<base>_metadata.csv`). The format is picked from the file extension.

pub mod csv;
pub mod json;

use std::path::Path;
use thiserror::Error;

use crate::models::BatteryRecordSet;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported input formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("json") => Ok(ImportFormat::Json),
            Some("csv") => Ok(ImportFormat::Csv),
            other => Err(ImportError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Importer trait implemented per format.
pub trait RecordSetImporter {
    fn import_file(&self, path: &Path) -> Result<BatteryRecordSet, ImportError>;
}

/// Load a record set, dispatching on the file extension.
pub fn load_record_set(path: &Path) -> Result<BatteryRecordSet, ImportError> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let set = match ImportFormat::from_path(path)? {
        ImportFormat::Json => json::JsonImporter.import_file(path)?,
        ImportFormat::Csv => csv::CsvImporter.import_file(path)?,
    };
    tracing::info!(
        path = %path.display(),
        cycles = set.cycle_data.len(),
        "record set loaded"
    );
    Ok(set)
}

/// File name without directories or extension, used as the dataset key for
/// nominal-capacity lookup.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
