//! Composite battery health assessment.
//!
//! Combines capacity retention, coulombic efficiency and voltage-limit
//! violations into a 0-100 score, a categorical status and an ordered list of
//! degradation indicators.

use serde::{Deserialize, Serialize};

use crate::models::BatteryRecordSet;

/// Categorical health status, derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthStatus {
    /// Status for a 0-100 health score. Lower bounds are inclusive: a score
    /// of exactly 95.0 is Excellent.
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            HealthStatus::Excellent
        } else if score >= 90.0 {
            HealthStatus::Good
        } else if score >= 80.0 {
            HealthStatus::Fair
        } else if score >= 70.0 {
            HealthStatus::Poor
        } else {
            HealthStatus::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::Poor => "Poor",
            HealthStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Degradation indicators, in fixed detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradationIndicator {
    #[serde(rename = "Capacity Fade")]
    CapacityFade,
    #[serde(rename = "Low Coulombic Efficiency")]
    LowCoulombicEfficiency,
    #[serde(rename = "Overvoltage Detected")]
    OvervoltageDetected,
    #[serde(rename = "Undervoltage Detected")]
    UndervoltageDetected,
}

impl DegradationIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradationIndicator::CapacityFade => "Capacity Fade",
            DegradationIndicator::LowCoulombicEfficiency => "Low Coulombic Efficiency",
            DegradationIndicator::OvervoltageDetected => "Overvoltage Detected",
            DegradationIndicator::UndervoltageDetected => "Undervoltage Detected",
        }
    }
}

impl std::fmt::Display for DegradationIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall health assessment for a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Health score in [0, 100]; None when retention is not computable
    pub health_score: Option<f64>,

    /// Categorical status; None alongside the score
    pub health_status: Option<HealthStatus>,

    /// Capacity retention percent between the first and last cycles with a
    /// recorded discharge capacity
    pub capacity_retention: Option<f64>,

    /// Indicators in detection order; duplicates are not suppressed
    pub degradation_indicators: Vec<DegradationIndicator>,
}

/// Health assessment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Retention percent below which Capacity Fade is flagged (default: 95)
    pub retention_warning_threshold: f64,

    /// Mean coulombic efficiency percent below which Low Coulombic
    /// Efficiency is flagged (default: 98)
    pub coulombic_efficiency_warning_threshold: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            retention_warning_threshold: 95.0,
            coulombic_efficiency_warning_threshold: 98.0,
        }
    }
}

/// Assesses overall battery health from a record set.
pub struct HealthAssessor {
    config: HealthConfig,
}

impl HealthAssessor {
    pub fn new() -> Self {
        HealthAssessor {
            config: HealthConfig::default(),
        }
    }

    pub fn with_config(config: HealthConfig) -> Self {
        HealthAssessor { config }
    }

    /// Assess battery health.
    ///
    /// Retention is taken from the first and last cycles with a non-empty
    /// discharge capacity. This scan deliberately ignores cycle numbers and
    /// intermediate gaps, so it tolerates sparser data than the capacity-fade
    /// analyzer. Voltage checks are skipped entirely when the corresponding
    /// limit is absent from the metadata.
    pub fn assess(&self, set: &BatteryRecordSet) -> HealthAssessment {
        let mut assessment = HealthAssessment {
            health_score: None,
            health_status: None,
            capacity_retention: None,
            degradation_indicators: Vec::new(),
        };

        let first_discharge = set
            .cycle_data
            .iter()
            .find_map(|c| c.max_discharge_capacity());
        let last_discharge = set
            .cycle_data
            .iter()
            .rev()
            .find_map(|c| c.max_discharge_capacity());

        if let (Some(first), Some(last)) = (first_discharge, last_discharge) {
            if first > 0.0 {
                let retention = last / first * 100.0;
                assessment.capacity_retention = Some(retention);

                let score = retention.clamp(0.0, 100.0);
                assessment.health_score = Some(score);
                assessment.health_status = Some(HealthStatus::from_score(score));

                if retention < self.config.retention_warning_threshold {
                    assessment
                        .degradation_indicators
                        .push(DegradationIndicator::CapacityFade);
                }
            }
        }

        if let Some(mean_ce) = self.mean_coulombic_efficiency(set) {
            if mean_ce < self.config.coulombic_efficiency_warning_threshold {
                assessment
                    .degradation_indicators
                    .push(DegradationIndicator::LowCoulombicEfficiency);
            }
        }

        if let Some(limit) = set.max_voltage_limit_in_v {
            if set.all_voltages().any(|v| v > limit) {
                assessment
                    .degradation_indicators
                    .push(DegradationIndicator::OvervoltageDetected);
            }
        }

        if let Some(limit) = set.min_voltage_limit_in_v {
            if set.all_voltages().any(|v| v < limit) {
                assessment
                    .degradation_indicators
                    .push(DegradationIndicator::UndervoltageDetected);
            }
        }

        tracing::debug!(
            score = ?assessment.health_score,
            indicators = assessment.degradation_indicators.len(),
            "health assessment complete"
        );

        assessment
    }

    /// Mean CE over cycles where both capacities are recorded and the charge
    /// capacity is positive. Unlike the fade analyzer this does not require
    /// cycle numbers.
    fn mean_coulombic_efficiency(&self, set: &BatteryRecordSet) -> Option<f64> {
        let efficiencies: Vec<f64> = set
            .cycle_data
            .iter()
            .filter_map(|cycle| {
                match (cycle.max_charge_capacity(), cycle.max_discharge_capacity()) {
                    (Some(charge), Some(discharge)) if charge > 0.0 => {
                        Some(discharge / charge * 100.0)
                    }
                    _ => None,
                }
            })
            .collect();
        if efficiencies.is_empty() {
            return None;
        }
        Some(efficiencies.iter().sum::<f64>() / efficiencies.len() as f64)
    }
}

impl Default for HealthAssessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleRecord;

    fn cycle(charge: Option<f64>, discharge: Option<f64>, voltages: Vec<f64>) -> CycleRecord {
        CycleRecord {
            cycle_number: None,
            current_in_a: vec![],
            voltage_in_v: voltages,
            time_in_s: vec![],
            charge_capacity_in_ah: charge.map(|c| vec![c]),
            discharge_capacity_in_ah: discharge.map(|c| vec![c]),
            temperature_in_c: None,
        }
    }

    fn set_of(cycles: Vec<CycleRecord>) -> BatteryRecordSet {
        BatteryRecordSet {
            cycle_data: cycles,
            ..BatteryRecordSet::default()
        }
    }

    #[test]
    fn test_status_boundaries_are_inclusive() {
        assert_eq!(HealthStatus::from_score(95.0), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(94.999), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(90.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(80.0), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(70.0), HealthStatus::Poor);
        assert_eq!(HealthStatus::from_score(69.999), HealthStatus::Critical);
    }

    #[test]
    fn test_healthy_cell() {
        let set = set_of(vec![
            cycle(Some(2.0), Some(1.99), vec![]),
            cycle(Some(2.0), Some(1.97), vec![]),
        ]);
        let assessment = HealthAssessor::new().assess(&set);
        assert_eq!(assessment.health_status, Some(HealthStatus::Excellent));
        assert!(assessment.degradation_indicators.is_empty());
    }

    #[test]
    fn test_capacity_fade_indicator_and_score() {
        let set = set_of(vec![
            cycle(None, Some(2.0), vec![]),
            cycle(None, Some(1.7), vec![]),
        ]);
        let assessment = HealthAssessor::new().assess(&set);
        let retention = assessment.capacity_retention.unwrap();
        assert!((retention - 85.0).abs() < 1e-9);
        assert_eq!(assessment.health_status, Some(HealthStatus::Fair));
        assert_eq!(
            assessment.degradation_indicators,
            vec![DegradationIndicator::CapacityFade]
        );
    }

    #[test]
    fn test_retention_tolerates_missing_intermediate_cycles() {
        let set = set_of(vec![
            cycle(None, Some(2.0), vec![]),
            cycle(None, None, vec![]),
            cycle(None, Some(1.96), vec![]),
            cycle(None, None, vec![]),
        ]);
        let assessment = HealthAssessor::new().assess(&set);
        assert!((assessment.capacity_retention.unwrap() - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_discharge_data_gives_null_score() {
        let set = set_of(vec![cycle(Some(2.0), None, vec![3.6])]);
        let assessment = HealthAssessor::new().assess(&set);
        assert_eq!(assessment.health_score, None);
        assert_eq!(assessment.health_status, None);
        assert_eq!(assessment.capacity_retention, None);
    }

    #[test]
    fn test_low_coulombic_efficiency_indicator() {
        let set = set_of(vec![
            cycle(Some(2.0), Some(1.9), vec![]), // CE 95%
            cycle(Some(2.0), Some(1.9), vec![]),
        ]);
        let assessment = HealthAssessor::new().assess(&set);
        assert!(assessment
            .degradation_indicators
            .contains(&DegradationIndicator::LowCoulombicEfficiency));
    }

    #[test]
    fn test_overvoltage_detected() {
        let mut set = set_of(vec![cycle(None, Some(2.0), vec![4.1, 4.3])]);
        set.max_voltage_limit_in_v = Some(4.2);
        let assessment = HealthAssessor::new().assess(&set);
        assert!(assessment
            .degradation_indicators
            .contains(&DegradationIndicator::OvervoltageDetected));
    }

    #[test]
    fn test_voltage_checks_skipped_without_limits() {
        let set = set_of(vec![cycle(None, Some(2.0), vec![5.0, 1.0])]);
        let assessment = HealthAssessor::new().assess(&set);
        assert!(!assessment
            .degradation_indicators
            .contains(&DegradationIndicator::OvervoltageDetected));
        assert!(!assessment
            .degradation_indicators
            .contains(&DegradationIndicator::UndervoltageDetected));
    }

    #[test]
    fn test_indicator_order_is_fixed() {
        let mut set = set_of(vec![
            cycle(Some(2.0), Some(2.0), vec![4.3, 2.0]),
            cycle(Some(2.0), Some(1.7), vec![4.0, 3.0]),
        ]);
        set.max_voltage_limit_in_v = Some(4.2);
        set.min_voltage_limit_in_v = Some(2.5);
        let assessment = HealthAssessor::new().assess(&set);
        assert_eq!(
            assessment.degradation_indicators,
            vec![
                DegradationIndicator::CapacityFade,
                DegradationIndicator::LowCoulombicEfficiency,
                DegradationIndicator::OvervoltageDetected,
                DegradationIndicator::UndervoltageDetected,
            ]
        );
    }

    #[test]
    fn test_serde_indicator_labels() {
        let json = serde_json::to_string(&DegradationIndicator::CapacityFade).unwrap();
        assert_eq!(json, "\"Capacity Fade\"");
    }
}
