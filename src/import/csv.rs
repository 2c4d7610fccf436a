//! CSV record-set importer.
//!
//! Expects a `<base>_cycles.csv` with one row per sample and an optional
//! `<base>_metadata.csv` with `key,value` rows next to it. Samples are
//! grouped into cycles by `cycle_number`, preserving first-seen order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{ImportError, RecordSetImporter};
use crate::models::{BatteryRecordSet, CycleRecord};

#[derive(Debug, Deserialize)]
struct SampleRow {
    cycle_number: u32,

    #[serde(rename = "current_in_A")]
    current_in_a: f64,

    #[serde(rename = "voltage_in_V")]
    voltage_in_v: f64,

    time_in_s: f64,

    #[serde(rename = "charge_capacity_in_Ah", default)]
    charge_capacity_in_ah: Option<f64>,

    #[serde(rename = "discharge_capacity_in_Ah", default)]
    discharge_capacity_in_ah: Option<f64>,

    #[serde(rename = "temperature_in_C", default)]
    temperature_in_c: Option<f64>,
}

/// Imports a record set from a cycles CSV plus an optional metadata CSV.
pub struct CsvImporter;

impl RecordSetImporter for CsvImporter {
    fn import_file(&self, path: &Path) -> Result<BatteryRecordSet, ImportError> {
        let mut set = read_cycles(path)?;
        let metadata_path = sibling_metadata_path(path);
        if metadata_path.exists() {
            apply_metadata(&mut set, &metadata_path)?;
        }
        Ok(set)
    }
}

fn read_cycles(path: &Path) -> Result<BatteryRecordSet, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut cycles: Vec<CycleRecord> = Vec::new();
    let mut index_by_number: HashMap<u32, usize> = HashMap::new();

    for (line, result) in reader.deserialize::<SampleRow>().enumerate() {
        let row = result
            .map_err(|e| ImportError::ParseError(format!("row {}: {}", line + 2, e)))?;

        let idx = *index_by_number.entry(row.cycle_number).or_insert_with(|| {
            cycles.push(CycleRecord {
                cycle_number: Some(row.cycle_number),
                current_in_a: Vec::new(),
                voltage_in_v: Vec::new(),
                time_in_s: Vec::new(),
                charge_capacity_in_ah: None,
                discharge_capacity_in_ah: None,
                temperature_in_c: None,
            });
            cycles.len() - 1
        });

        let cycle = &mut cycles[idx];
        cycle.current_in_a.push(row.current_in_a);
        cycle.voltage_in_v.push(row.voltage_in_v);
        cycle.time_in_s.push(row.time_in_s);
        if let Some(v) = row.charge_capacity_in_ah {
            cycle.charge_capacity_in_ah.get_or_insert_with(Vec::new).push(v);
        }
        if let Some(v) = row.discharge_capacity_in_ah {
            cycle
                .discharge_capacity_in_ah
                .get_or_insert_with(Vec::new)
                .push(v);
        }
        if let Some(v) = row.temperature_in_c {
            cycle.temperature_in_c.get_or_insert_with(Vec::new).push(v);
        }
    }

    if cycles.is_empty() {
        return Err(ImportError::InvalidStructure(format!(
            "{}: no sample rows",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), cycles = cycles.len(), "parsed cycles CSV");
    Ok(BatteryRecordSet {
        cycle_data: cycles,
        ..BatteryRecordSet::default()
    })
}

/// `<base>_metadata.csv` next to `<base>_cycles.csv`. When the file name
/// does not carry the `_cycles` suffix the whole stem is used as the base.
fn sibling_metadata_path(cycles_path: &Path) -> PathBuf {
    let stem = cycles_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let base = stem.strip_suffix("_cycles").unwrap_or(stem);
    cycles_path.with_file_name(format!("{base}_metadata.csv"))
}

fn parse_value(key: &str, value: &str) -> Result<f64, ImportError> {
    value
        .parse::<f64>()
        .map_err(|_| ImportError::ParseError(format!("metadata {key}: invalid number {value:?}")))
}

fn apply_metadata(set: &mut BatteryRecordSet, path: &Path) -> Result<(), ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut soc_low = None;
    let mut soc_high = None;

    for result in reader.records() {
        let record =
            result.map_err(|e| ImportError::ParseError(format!("{}: {}", path.display(), e)))?;
        let (key, value) = match (record.get(0), record.get(1)) {
            (Some(k), Some(v)) => (k, v),
            _ => {
                return Err(ImportError::InvalidStructure(format!(
                    "{}: metadata rows need key,value columns",
                    path.display()
                )))
            }
        };

        match key {
            "cell_id" => set.cell_id = Some(value.to_string()),
            "form_factor" => set.form_factor = Some(value.to_string()),
            "anode_material" => set.anode_material = Some(value.to_string()),
            "cathode_material" => set.cathode_material = Some(value.to_string()),
            "nominal_capacity_in_Ah" => {
                set.nominal_capacity_in_ah = Some(parse_value(key, value)?)
            }
            "soc_interval_low" => soc_low = Some(parse_value(key, value)?),
            "soc_interval_high" => soc_high = Some(parse_value(key, value)?),
            "max_voltage_limit_in_V" => {
                set.max_voltage_limit_in_v = Some(parse_value(key, value)?)
            }
            "min_voltage_limit_in_V" => {
                set.min_voltage_limit_in_v = Some(parse_value(key, value)?)
            }
            "max_current_limit_in_A" => {
                set.max_current_limit_in_a = Some(parse_value(key, value)?)
            }
            "min_current_limit_in_A" => {
                set.min_current_limit_in_a = Some(parse_value(key, value)?)
            }
            other => {
                tracing::warn!(key = other, "ignoring unknown metadata key");
            }
        }
    }

    if let (Some(low), Some(high)) = (soc_low, soc_high) {
        set.soc_interval = Some([low, high]);
    }

    tracing::debug!(path = %path.display(), "applied metadata CSV");
    Ok(())
}
