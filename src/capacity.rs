//! Capacity fade analysis.
//!
//! Works over the same per-cycle records as the SOH pipeline but is
//! independent of the EOL branch policy: fade, retention and coulombic
//! efficiency are derived from raw charge/discharge capacities.

use serde::{Deserialize, Serialize};

use crate::models::BatteryRecordSet;

/// Capacity fade metrics and per-cycle efficiency series.
///
/// Series entries correspond to qualifying cycles only (a cycle number plus
/// at least one capacity value); skipped cycles are omitted, not null-padded,
/// and cycle order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityFadeAnalysis {
    /// Cycle numbers of qualifying cycles
    pub cycle_numbers: Vec<u32>,

    /// Max charge capacity per qualifying cycle (None when not recorded)
    pub charge_capacities: Vec<Option<f64>>,

    /// Max discharge capacity per qualifying cycle (None when not recorded)
    pub discharge_capacities: Vec<Option<f64>>,

    /// Coulombic efficiency per qualifying cycle, percent (None when the
    /// charge capacity is missing or non-positive)
    pub coulombic_efficiencies: Vec<Option<f64>>,

    /// Percent capacity lost between first and last qualifying cycle
    pub capacity_fade_percentage: Option<f64>,

    /// Fade percent per cycle over the observed cycle-number span
    pub capacity_fade_rate_per_cycle: Option<f64>,

    /// 100 − fade percentage
    pub capacity_retention_percentage: Option<f64>,
}

/// Computes capacity fade metrics from a battery record set.
pub struct CapacityFadeAnalyzer;

impl CapacityFadeAnalyzer {
    /// Analyze capacity fade over the record set's cycles.
    ///
    /// Cycles without a cycle number or with neither capacity recorded are
    /// skipped. All division paths are pre-guarded; a missing or zero
    /// denominator yields None, never an error.
    pub fn analyze(set: &BatteryRecordSet) -> CapacityFadeAnalysis {
        let mut analysis = CapacityFadeAnalysis {
            cycle_numbers: Vec::new(),
            charge_capacities: Vec::new(),
            discharge_capacities: Vec::new(),
            coulombic_efficiencies: Vec::new(),
            capacity_fade_percentage: None,
            capacity_fade_rate_per_cycle: None,
            capacity_retention_percentage: None,
        };

        for cycle in &set.cycle_data {
            let Some(cycle_num) = cycle.cycle_number else {
                continue;
            };

            let charge_cap = cycle.max_charge_capacity();
            let discharge_cap = cycle.max_discharge_capacity();
            if charge_cap.is_none() && discharge_cap.is_none() {
                continue;
            }

            let coulombic_efficiency = match (charge_cap, discharge_cap) {
                (Some(charge), Some(discharge)) if charge > 0.0 => {
                    Some(discharge / charge * 100.0)
                }
                _ => None,
            };

            analysis.cycle_numbers.push(cycle_num);
            analysis.charge_capacities.push(charge_cap);
            analysis.discharge_capacities.push(discharge_cap);
            analysis.coulombic_efficiencies.push(coulombic_efficiency);
        }

        if analysis.cycle_numbers.len() > 1 {
            if let (Some(Some(initial)), Some(Some(last))) = (
                analysis.discharge_capacities.first(),
                analysis.discharge_capacities.last(),
            ) {
                if *initial > 0.0 {
                    let fade = (initial - last) / initial * 100.0;
                    analysis.capacity_fade_percentage = Some(fade);
                    analysis.capacity_retention_percentage = Some(100.0 - fade);

                    let cycle_span = analysis.cycle_numbers[analysis.cycle_numbers.len() - 1]
                        as i64
                        - analysis.cycle_numbers[0] as i64;
                    if cycle_span > 0 {
                        analysis.capacity_fade_rate_per_cycle = Some(fade / cycle_span as f64);
                    }
                }
            }
        }

        tracing::debug!(
            qualifying_cycles = analysis.cycle_numbers.len(),
            fade = ?analysis.capacity_fade_percentage,
            "capacity fade analysis complete"
        );

        analysis
    }

    /// Mean coulombic efficiency across qualifying cycles, if any were
    /// computable.
    pub fn mean_coulombic_efficiency(analysis: &CapacityFadeAnalysis) -> Option<f64> {
        let efficiencies: Vec<f64> = analysis
            .coulombic_efficiencies
            .iter()
            .flatten()
            .copied()
            .collect();
        if efficiencies.is_empty() {
            return None;
        }
        Some(efficiencies.iter().sum::<f64>() / efficiencies.len() as f64)
    }
}
