//! Report assembly.
//!
//! `RulReporter` turns an EOL estimate into the RUL summary; `BatteryAnalyzer`
//! runs the full pipeline (SOH → EOL → RUL, plus the independent capacity,
//! health and statistics passes) and assembles the final report. Both are pure
//! aggregation with no failure modes of their own beyond propagating upstream
//! errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capacity::{CapacityFadeAnalysis, CapacityFadeAnalyzer};
use crate::config::AppConfig;
use crate::eol::{EolEstimate, EolEstimator, EolMethod};
use crate::error::Result;
use crate::health::{HealthAssessment, HealthAssessor};
use crate::models::BatteryRecordSet;
use crate::soh::{SohSeries, SohSeriesBuilder};
use crate::statistics::{StatisticalSummarizer, StatisticalSummary};

/// SOH/EOL/RUL summary for one battery record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySummary {
    /// Source file identifier, when the record set came from a file
    pub file: Option<String>,

    /// Nominal capacity the SOH series was normalized against
    #[serde(rename = "nominal_capacity_in_Ah")]
    pub nominal_capacity_in_ah: f64,

    /// Number of cycles recorded
    pub num_cycles_recorded: u32,

    /// Last observed SOH
    pub last_soh: f64,

    /// Estimated end-of-life cycle index, None when excluded
    pub eol: Option<i64>,

    /// Branch that produced the EOL estimate
    pub eol_method: EolMethod,

    /// Un-floored regression prediction, regression branch only
    pub eol_pred_float: Option<f64>,

    /// Cycles remaining between the last recorded cycle and EOL
    pub rul_cycles_from_last_record: Option<i64>,

    /// Full SOH series, for auditability
    pub soh_series: Vec<f64>,
}

/// Combines an EOL estimate with the series length into the RUL summary.
pub struct RulReporter;

impl RulReporter {
    /// `RUL = EOL − last_cycle_index` when EOL is known, else None.
    ///
    /// `last_cycle_index` is the recorded-cycle count (1-based), not the
    /// `cycle_number` field value, so gaps or non-1-based numbering in the
    /// source telemetry do not skew the result.
    pub fn report(
        file: Option<&str>,
        series: &SohSeries,
        estimate: &EolEstimate,
    ) -> BatterySummary {
        let rul = estimate.eol.map(|eol| eol - estimate.last_cycle as i64);

        BatterySummary {
            file: file.map(|f| f.to_string()),
            nominal_capacity_in_ah: series.nominal_capacity_in_ah,
            num_cycles_recorded: estimate.last_cycle,
            last_soh: estimate.last_soh,
            eol: estimate.eol,
            eol_method: estimate.method,
            eol_pred_float: estimate.eol_pred_float,
            rul_cycles_from_last_record: rul,
            soh_series: series.values.clone(),
        }
    }
}

/// Echo of the record set's cell-level metadata plus derived counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSetMetadata {
    pub cell_id: Option<String>,
    pub form_factor: Option<String>,
    pub anode_material: Option<String>,
    pub cathode_material: Option<String>,

    #[serde(rename = "nominal_capacity_in_Ah")]
    pub nominal_capacity_in_ah: Option<f64>,

    #[serde(rename = "max_voltage_limit_in_V")]
    pub max_voltage_limit_in_v: Option<f64>,

    #[serde(rename = "min_voltage_limit_in_V")]
    pub min_voltage_limit_in_v: Option<f64>,

    pub total_cycles: u32,

    /// Smallest recorded `cycle_number`, when any cycle carries one
    pub first_cycle_number: Option<u32>,

    /// Largest recorded `cycle_number`, when any cycle carries one
    pub last_cycle_number: Option<u32>,

    /// Mean temperature of the first cycle, when recorded
    pub test_temperature_c: Option<f64>,
}

impl RecordSetMetadata {
    pub fn from_record_set(set: &BatteryRecordSet) -> Self {
        let cycle_numbers: Vec<u32> = set
            .cycle_data
            .iter()
            .filter_map(|c| c.cycle_number)
            .collect();

        RecordSetMetadata {
            cell_id: set.cell_id.clone(),
            form_factor: set.form_factor.clone(),
            anode_material: set.anode_material.clone(),
            cathode_material: set.cathode_material.clone(),
            nominal_capacity_in_ah: set.nominal_capacity_in_ah,
            max_voltage_limit_in_v: set.max_voltage_limit_in_v,
            min_voltage_limit_in_v: set.min_voltage_limit_in_v,
            total_cycles: set.cycle_data.len() as u32,
            first_cycle_number: cycle_numbers.iter().min().copied(),
            last_cycle_number: cycle_numbers.iter().max().copied(),
            test_temperature_c: set.cycle_data.first().and_then(|c| c.mean_temperature()),
        }
    }
}

/// Complete degradation report for one battery record set.
///
/// JSON-serializable; all numeric values are plain floats and integers, so
/// the report crosses the CLI/HTTP presentation boundary without wrapper
/// types. Note the report may carry two EOL estimates (the SOH policy's and
/// the statistical projection's) that disagree; that disagreement is
/// intentional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryReport {
    pub generated_at: DateTime<Utc>,
    pub summary: BatterySummary,
    pub metadata: RecordSetMetadata,
    pub capacity_fade: CapacityFadeAnalysis,
    pub battery_health: HealthAssessment,
    pub statistics: StatisticalSummary,
}

/// Runs the full analysis pipeline over a record set.
pub struct BatteryAnalyzer {
    soh_builder: SohSeriesBuilder,
    eol_estimator: EolEstimator,
    health_assessor: HealthAssessor,
    summarizer: StatisticalSummarizer,
}

impl BatteryAnalyzer {
    pub fn new() -> Self {
        Self::from_config(&AppConfig::default())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        BatteryAnalyzer {
            soh_builder: SohSeriesBuilder::with_capacity_table(config.capacity_table()),
            eol_estimator: EolEstimator::with_config(config.eol.clone()),
            health_assessor: HealthAssessor::with_config(config.health.clone()),
            summarizer: StatisticalSummarizer::with_config(config.projection.clone()),
        }
    }

    /// SOH → EOL → RUL summary only (the primary pipeline).
    pub fn summarize(
        &self,
        set: &BatteryRecordSet,
        file_name: Option<&str>,
    ) -> Result<BatterySummary> {
        let series = self.soh_builder.build(set, file_name)?;
        let estimate = self.eol_estimator.estimate(&series)?;
        Ok(RulReporter::report(file_name, &series, &estimate))
    }

    /// Full report: the primary pipeline plus the independent capacity-fade,
    /// health and statistics passes.
    pub fn analyze(
        &self,
        set: &BatteryRecordSet,
        file_name: Option<&str>,
    ) -> Result<BatteryReport> {
        let summary = self.summarize(set, file_name)?;

        tracing::info!(
            file = ?file_name,
            cycles = summary.num_cycles_recorded,
            last_soh = summary.last_soh,
            eol = ?summary.eol,
            "battery analysis complete"
        );

        Ok(BatteryReport {
            generated_at: Utc::now(),
            metadata: RecordSetMetadata::from_record_set(set),
            capacity_fade: CapacityFadeAnalyzer::analyze(set),
            battery_health: self.health_assessor.assess(set),
            statistics: self.summarizer.summarize(set),
            summary,
        })
    }
}

impl Default for BatteryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eol::EolMethod;
    use crate::models::CycleRecord;

    fn soh_series(values: Vec<f64>) -> SohSeries {
        SohSeries {
            values,
            nominal_capacity_in_ah: 2.0,
            soc_interval_width: 1.0,
        }
    }

    #[test]
    fn test_rul_from_estimate() {
        let series = soh_series(vec![0.9, 0.85, 0.79]);
        let estimate = EolEstimator::new().estimate(&series).unwrap();
        let summary = RulReporter::report(Some("cell.json"), &series, &estimate);

        assert_eq!(summary.eol, Some(3));
        assert_eq!(summary.num_cycles_recorded, 3);
        assert_eq!(summary.rul_cycles_from_last_record, Some(0));
        assert_eq!(summary.eol_method, EolMethod::FirstCrossing);
        assert_eq!(summary.file.as_deref(), Some("cell.json"));
    }

    #[test]
    fn test_rul_none_when_excluded() {
        let series = soh_series(vec![0.95, 0.9]);
        let estimate = EolEstimator::new().estimate(&series).unwrap();
        let summary = RulReporter::report(None, &series, &estimate);

        assert_eq!(summary.eol, None);
        assert_eq!(summary.rul_cycles_from_last_record, None);
    }

    #[test]
    fn test_rul_uses_recorded_count_not_cycle_numbers() {
        // Source numbering starts at 100 with gaps; RUL must still be
        // relative to the recorded count.
        let set = BatteryRecordSet {
            cycle_data: vec![
                CycleRecord {
                    cycle_number: Some(100),
                    current_in_a: vec![],
                    voltage_in_v: vec![],
                    time_in_s: vec![],
                    charge_capacity_in_ah: None,
                    discharge_capacity_in_ah: Some(vec![2.0]),
                    temperature_in_c: None,
                },
                CycleRecord {
                    cycle_number: Some(250),
                    current_in_a: vec![],
                    voltage_in_v: vec![],
                    time_in_s: vec![],
                    charge_capacity_in_ah: None,
                    discharge_capacity_in_ah: Some(vec![1.5]),
                    temperature_in_c: None,
                },
            ],
            nominal_capacity_in_ah: Some(2.0),
            ..BatteryRecordSet::default()
        };
        let summary = BatteryAnalyzer::new().summarize(&set, None).unwrap();
        assert_eq!(summary.num_cycles_recorded, 2);
        // SOH 0.75 at cycle 2: first crossing at recorded index 2
        assert_eq!(summary.eol, Some(2));
        assert_eq!(summary.rul_cycles_from_last_record, Some(0));
    }

    #[test]
    fn test_metadata_from_record_set() {
        let set = BatteryRecordSet {
            cycle_data: vec![
                CycleRecord {
                    cycle_number: Some(7),
                    current_in_a: vec![],
                    voltage_in_v: vec![],
                    time_in_s: vec![],
                    charge_capacity_in_ah: None,
                    discharge_capacity_in_ah: Some(vec![1.0]),
                    temperature_in_c: Some(vec![24.0, 26.0]),
                },
                CycleRecord {
                    cycle_number: Some(3),
                    current_in_a: vec![],
                    voltage_in_v: vec![],
                    time_in_s: vec![],
                    charge_capacity_in_ah: None,
                    discharge_capacity_in_ah: Some(vec![1.0]),
                    temperature_in_c: None,
                },
            ],
            cell_id: Some("CALB_35_1".to_string()),
            nominal_capacity_in_ah: Some(2.0),
            ..BatteryRecordSet::default()
        };
        let metadata = RecordSetMetadata::from_record_set(&set);
        assert_eq!(metadata.total_cycles, 2);
        assert_eq!(metadata.first_cycle_number, Some(3));
        assert_eq!(metadata.last_cycle_number, Some(7));
        assert_eq!(metadata.test_temperature_c, Some(25.0));
        assert_eq!(metadata.cell_id.as_deref(), Some("CALB_35_1"));
    }

    #[test]
    fn test_report_serializes_to_plain_json() {
        let set = BatteryRecordSet {
            cycle_data: vec![CycleRecord {
                cycle_number: Some(1),
                current_in_a: vec![1.0],
                voltage_in_v: vec![3.6],
                time_in_s: vec![0.0],
                charge_capacity_in_ah: Some(vec![2.0]),
                discharge_capacity_in_ah: Some(vec![1.9]),
                temperature_in_c: None,
            }],
            nominal_capacity_in_ah: Some(2.0),
            ..BatteryRecordSet::default()
        };
        let report = BatteryAnalyzer::new().analyze(&set, Some("cell.json")).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["num_cycles_recorded"], 1);
        assert_eq!(json["summary"]["eol_method"], "excluded");
        assert_eq!(json["metadata"]["total_cycles"], 1);
    }
}
