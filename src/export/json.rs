//! JSON report writer.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::ExportError;
use crate::report::BatteryReport;

/// Write the full report as pretty-printed JSON.
pub fn write_report(report: &BatteryReport, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Render the report as a JSON string, for stdout output.
pub fn render_report(report: &BatteryReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
