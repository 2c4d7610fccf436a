//! Statistical summaries and the regression cycle-life projection.
//!
//! The projection here is advisory and independent of the SOH-based EOL
//! estimator; the two may disagree and both are reported.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::models::BatteryRecordSet;
use crate::regression::LinearFit;

/// Five-number summary of an observed distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl DistributionSummary {
    /// Summarize a sample. None for an empty sample. The standard deviation
    /// is the population form, matching the source telemetry tooling.
    pub fn from_values(values: &[f64]) -> Option<DistributionSummary> {
        if values.is_empty() {
            return None;
        }
        let mut data = Data::new(values.to_vec());
        Some(DistributionSummary {
            mean: values.mean(),
            median: data.median(),
            min: values.min(),
            max: values.max(),
            std_dev: values.population_std_dev(),
        })
    }
}

/// Linear cycle-life projection from the discharge-capacity trend.
///
/// Present only when the fitted slope is negative (capacity is actually
/// decreasing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleLifeProjection {
    /// Fitted capacity change per cycle, in Ah (negative)
    pub fade_rate: f64,

    /// Coefficient of determination of the fit
    pub r_squared: f64,

    /// Discharge capacity of the first qualifying cycle, in Ah
    pub initial_capacity: f64,

    /// Capacity defining end of life (fraction of initial), in Ah
    pub eol_capacity: f64,

    /// Cycle number at which the fitted line reaches the EOL capacity;
    /// None when the solved cycle is not positive
    pub projected_eol_cycle: Option<i64>,

    /// R² reused as a confidence measure
    pub confidence: f64,
}

/// Aggregated statistics over a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    /// Distribution of per-cycle max charge capacities
    pub charge_capacity: Option<DistributionSummary>,

    /// Distribution of per-cycle max discharge capacities
    pub discharge_capacity: Option<DistributionSummary>,

    /// Distribution of all current samples across all cycles
    pub current: Option<DistributionSummary>,

    /// Distribution of all voltage samples across all cycles
    pub voltage: Option<DistributionSummary>,

    pub cycle_life_projection: Option<CycleLifeProjection>,
}

/// Cycle-life projection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Minimum qualifying cycles before fitting (default: 6)
    pub min_cycles: usize,

    /// EOL capacity as a fraction of initial capacity (default: 0.8)
    pub eol_capacity_fraction: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            min_cycles: 6,
            eol_capacity_fraction: 0.8,
        }
    }
}

/// Computes statistical summaries and the cycle-life projection.
pub struct StatisticalSummarizer {
    config: ProjectionConfig,
}

impl StatisticalSummarizer {
    pub fn new() -> Self {
        StatisticalSummarizer {
            config: ProjectionConfig::default(),
        }
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        StatisticalSummarizer { config }
    }

    /// Summarize the record set's distributions and fit the capacity trend.
    pub fn summarize(&self, set: &BatteryRecordSet) -> StatisticalSummary {
        let mut charge_caps = Vec::new();
        let mut discharge_caps = Vec::new();
        let mut trend_cycles = Vec::new();
        let mut trend_caps = Vec::new();

        for cycle in &set.cycle_data {
            if let Some(charge) = cycle.max_charge_capacity() {
                charge_caps.push(charge);
            }
            let discharge = cycle.max_discharge_capacity();
            if let Some(discharge) = discharge {
                discharge_caps.push(discharge);
            }
            if let (Some(num), Some(cap)) = (cycle.cycle_number, discharge) {
                trend_cycles.push(num as f64);
                trend_caps.push(cap);
            }
        }

        let currents: Vec<f64> = set.all_currents().collect();
        let voltages: Vec<f64> = set.all_voltages().collect();

        StatisticalSummary {
            charge_capacity: DistributionSummary::from_values(&charge_caps),
            discharge_capacity: DistributionSummary::from_values(&discharge_caps),
            current: DistributionSummary::from_values(&currents),
            voltage: DistributionSummary::from_values(&voltages),
            cycle_life_projection: self.project_cycle_life(&trend_cycles, &trend_caps),
        }
    }

    /// Fit discharge capacity on cycle number (conventional orientation,
    /// unlike the EOL estimator's inverted fit) and solve for the cycle at
    /// which capacity reaches the EOL fraction of its initial value.
    fn project_cycle_life(&self, cycles: &[f64], capacities: &[f64]) -> Option<CycleLifeProjection> {
        if cycles.len() < self.config.min_cycles {
            return None;
        }

        let fit = LinearFit::fit(cycles, capacities)?;
        if fit.slope >= 0.0 {
            // Capacity not decreasing; nothing to project
            return None;
        }

        let initial_capacity = capacities[0];
        let eol_capacity = self.config.eol_capacity_fraction * initial_capacity;
        let eol_cycle = (eol_capacity - fit.intercept) / fit.slope;

        tracing::debug!(
            slope = fit.slope,
            r_squared = fit.r_squared,
            eol_cycle,
            "cycle-life projection fitted"
        );

        Some(CycleLifeProjection {
            fade_rate: fit.slope,
            r_squared: fit.r_squared,
            initial_capacity,
            eol_capacity,
            projected_eol_cycle: if eol_cycle > 0.0 {
                Some(eol_cycle as i64)
            } else {
                None
            },
            confidence: fit.r_squared,
        })
    }
}

impl Default for StatisticalSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleRecord;

    fn cycle(num: u32, discharge: f64) -> CycleRecord {
        CycleRecord {
            cycle_number: Some(num),
            current_in_a: vec![1.0, -1.0],
            voltage_in_v: vec![3.0 + num as f64 * 0.01],
            time_in_s: vec![],
            charge_capacity_in_ah: Some(vec![discharge * 1.01]),
            discharge_capacity_in_ah: Some(vec![0.0, discharge]),
            temperature_in_c: None,
        }
    }

    fn linear_fade_set(n: u32, initial: f64, per_cycle: f64) -> BatteryRecordSet {
        BatteryRecordSet {
            cycle_data: (1..=n)
                .map(|i| cycle(i, initial - per_cycle * (i - 1) as f64))
                .collect(),
            ..BatteryRecordSet::default()
        }
    }

    #[test]
    fn test_distribution_summary() {
        let summary = DistributionSummary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((summary.mean - 2.5).abs() < 1e-12);
        assert!((summary.median - 2.5).abs() < 1e-9);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        // population std dev of 1..4 is sqrt(1.25)
        assert!((summary.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_summary_empty() {
        assert_eq!(DistributionSummary::from_values(&[]), None);
    }

    #[test]
    fn test_projection_on_linear_fade() {
        // capacity(c) = 2.0 - (c - 1)/64; EOL capacity 1.6 at cycle 26.6
        let set = linear_fade_set(10, 2.0, 1.0 / 64.0);
        let summary = StatisticalSummarizer::new().summarize(&set);
        let projection = summary.cycle_life_projection.unwrap();
        assert!((projection.fade_rate + 1.0 / 64.0).abs() < 1e-9);
        assert!((projection.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(projection.projected_eol_cycle, Some(26));
        assert!((projection.eol_capacity - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_projection_requires_min_cycles() {
        let set = linear_fade_set(5, 2.0, 0.01);
        let summary = StatisticalSummarizer::new().summarize(&set);
        assert_eq!(summary.cycle_life_projection, None);
    }

    #[test]
    fn test_projection_absent_when_capacity_increasing() {
        let set = linear_fade_set(10, 2.0, -0.01);
        let summary = StatisticalSummarizer::new().summarize(&set);
        assert_eq!(summary.cycle_life_projection, None);
    }

    #[test]
    fn test_stats_skip_cycles_without_fields() {
        let mut set = linear_fade_set(6, 2.0, 0.01);
        set.cycle_data.push(CycleRecord {
            cycle_number: None,
            current_in_a: vec![],
            voltage_in_v: vec![],
            time_in_s: vec![],
            charge_capacity_in_ah: None,
            discharge_capacity_in_ah: None,
            temperature_in_c: None,
        });
        let summary = StatisticalSummarizer::new().summarize(&set);
        // The empty trailing cycle contributes to no distribution
        assert_eq!(summary.discharge_capacity.as_ref().map(|s| s.max), Some(2.0));
        assert!(summary.cycle_life_projection.is_some());
    }
}
