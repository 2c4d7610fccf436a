//! JSON record-set importer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{ImportError, RecordSetImporter};
use crate::models::BatteryRecordSet;

/// Imports a record set from a single JSON document.
///
/// The document mirrors the serialized form of [`BatteryRecordSet`]: a
/// `cycle_data` array plus optional top-level metadata fields. Unknown
/// fields are ignored.
pub struct JsonImporter;

impl RecordSetImporter for JsonImporter {
    fn import_file(&self, path: &Path) -> Result<BatteryRecordSet, ImportError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let set: BatteryRecordSet = serde_json::from_reader(reader)
            .map_err(|e| ImportError::ParseError(format!("{}: {}", path.display(), e)))?;

        if set.cycle_data.is_empty() {
            return Err(ImportError::InvalidStructure(format!(
                "{}: cycle_data is empty",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "parsed JSON record set");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_import_minimal_document() {
        let file = write_json(
            r#"{
                "cycle_data": [
                    {
                        "cycle_number": 1,
                        "current_in_A": [1.0, -1.0],
                        "voltage_in_V": [4.1, 3.1],
                        "time_in_s": [0.0, 1800.0],
                        "discharge_capacity_in_Ah": [0.0, 1.8]
                    }
                ],
                "nominal_capacity_in_Ah": 1.85,
                "SOC_interval": [0.2, 0.8]
            }"#,
        );

        let set = JsonImporter.import_file(file.path()).unwrap();
        assert_eq!(set.cycle_data.len(), 1);
        assert_eq!(set.cycle_data[0].cycle_number, Some(1));
        assert_eq!(set.cycle_data[0].max_discharge_capacity(), Some(1.8));
        assert_eq!(set.nominal_capacity_in_ah, Some(1.85));
        assert!((set.soc_interval_width() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_import_rejects_empty_cycle_data() {
        let file = write_json(r#"{"cycle_data": []}"#);
        let err = JsonImporter.import_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidStructure(_)));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let file = write_json("{not json");
        let err = JsonImporter.import_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::ParseError(_)));
    }

    #[test]
    fn test_full_precision_floats_survive_reimport() {
        use crate::models::{BatteryRecordSet, CycleRecord};

        // Values with no short decimal form must read back bit-identical
        // from the crate's own serialized output.
        let set = BatteryRecordSet {
            cycle_data: vec![CycleRecord {
                cycle_number: Some(1),
                current_in_a: vec![0.1 + 0.2],
                voltage_in_v: vec![],
                time_in_s: vec![],
                charge_capacity_in_ah: None,
                discharge_capacity_in_ah: Some(vec![1.7775937499999999]),
                temperature_in_c: None,
            }],
            nominal_capacity_in_ah: Some(2.0),
            ..BatteryRecordSet::default()
        };

        let file = write_json(&serde_json::to_string(&set).unwrap());
        let loaded = JsonImporter.import_file(file.path()).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let file = write_json(
            r#"{
                "cycle_data": [
                    {"cycle_number": 1, "current_in_A": [], "voltage_in_V": [], "time_in_s": []}
                ],
                "some_vendor_field": {"a": 1}
            }"#,
        );
        let set = JsonImporter.import_file(file.path()).unwrap();
        assert_eq!(set.cycle_data.len(), 1);
    }
}
