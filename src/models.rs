use serde::{Deserialize, Serialize};

use crate::error::{CellRsError, Result};

/// One charge/discharge cycle as recorded by the cycler.
///
/// Field names follow the source telemetry keys exactly so that record
/// collections exported from cycler tooling deserialize without renaming.
/// Records are read-only once constructed; the analysis pipeline never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Cycle number as recorded by the cycler (may be absent, may have gaps)
    #[serde(default)]
    pub cycle_number: Option<u32>,

    /// Current samples in amperes
    #[serde(rename = "current_in_A", default)]
    pub current_in_a: Vec<f64>,

    /// Voltage samples in volts
    #[serde(rename = "voltage_in_V", default)]
    pub voltage_in_v: Vec<f64>,

    /// Elapsed time per sample in seconds
    #[serde(default)]
    pub time_in_s: Vec<f64>,

    /// Accumulated charge capacity in ampere-hours, aligned to the sample index
    #[serde(rename = "charge_capacity_in_Ah", default)]
    pub charge_capacity_in_ah: Option<Vec<f64>>,

    /// Accumulated discharge capacity in ampere-hours, aligned to the sample index
    #[serde(rename = "discharge_capacity_in_Ah", default)]
    pub discharge_capacity_in_ah: Option<Vec<f64>>,

    /// Cell temperature samples in degrees Celsius
    #[serde(rename = "temperature_in_C", default)]
    pub temperature_in_c: Option<Vec<f64>>,
}

fn max_of(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

fn min_of(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

impl CycleRecord {
    /// Maximum accumulated charge capacity for this cycle.
    ///
    /// Capacity sequences accumulate over the phase, so the maximum value is
    /// "the" capacity for that phase. None when the sequence is absent or
    /// empty.
    pub fn max_charge_capacity(&self) -> Option<f64> {
        self.charge_capacity_in_ah.as_deref().and_then(max_of)
    }

    /// Maximum accumulated discharge capacity for this cycle.
    pub fn max_discharge_capacity(&self) -> Option<f64> {
        self.discharge_capacity_in_ah.as_deref().and_then(max_of)
    }

    /// Mean cell temperature over the cycle, if recorded.
    pub fn mean_temperature(&self) -> Option<f64> {
        let temps = self.temperature_in_c.as_deref()?;
        if temps.is_empty() {
            return None;
        }
        Some(temps.iter().sum::<f64>() / temps.len() as f64)
    }

    pub fn max_voltage(&self) -> Option<f64> {
        max_of(&self.voltage_in_v)
    }

    pub fn min_voltage(&self) -> Option<f64> {
        min_of(&self.voltage_in_v)
    }

    pub fn max_current(&self) -> Option<f64> {
        max_of(&self.current_in_a)
    }

    pub fn min_current(&self) -> Option<f64> {
        min_of(&self.current_in_a)
    }
}

/// An ordered sequence of cycle records plus cell-level metadata.
///
/// Cycle order in `cycle_data` is the temporal order; `cycle_number`, when
/// present, is monotonically non-decreasing across the sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryRecordSet {
    /// Per-cycle telemetry records in temporal order
    pub cycle_data: Vec<CycleRecord>,

    /// Cell identifier from the source dataset
    #[serde(default)]
    pub cell_id: Option<String>,

    /// Rated capacity of the cell in ampere-hours
    #[serde(rename = "nominal_capacity_in_Ah", default)]
    pub nominal_capacity_in_ah: Option<f64>,

    /// Usable state-of-charge window as `[lower, upper]` fractions
    #[serde(rename = "SOC_interval", default)]
    pub soc_interval: Option<[f64; 2]>,

    /// Upper voltage safety limit in volts
    #[serde(rename = "max_voltage_limit_in_V", default)]
    pub max_voltage_limit_in_v: Option<f64>,

    /// Lower voltage safety limit in volts
    #[serde(rename = "min_voltage_limit_in_V", default)]
    pub min_voltage_limit_in_v: Option<f64>,

    /// Upper current safety limit in amperes
    #[serde(rename = "max_current_limit_in_A", default)]
    pub max_current_limit_in_a: Option<f64>,

    /// Lower current safety limit in amperes
    #[serde(rename = "min_current_limit_in_A", default)]
    pub min_current_limit_in_a: Option<f64>,

    #[serde(default)]
    pub form_factor: Option<String>,

    #[serde(default)]
    pub anode_material: Option<String>,

    #[serde(default)]
    pub cathode_material: Option<String>,
}

impl BatteryRecordSet {
    /// Check the structural preconditions for analysis.
    ///
    /// Per-cycle gaps (missing capacities, empty sequences) are tolerated
    /// downstream; an empty cycle sequence is not.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_data.is_empty() {
            return Err(CellRsError::InvalidInput(
                "cycle_data must be a non-empty sequence".to_string(),
            ));
        }
        Ok(())
    }

    /// Usable SOC window width.
    ///
    /// Defaults to the full 1.0 span when the interval is absent or either
    /// endpoint is non-finite. Width only rescales SOH and downstream
    /// thresholds are calibrated against the full-scale default, so a
    /// malformed interval is tolerated rather than fatal.
    pub fn soc_interval_width(&self) -> f64 {
        match self.soc_interval {
            Some([lower, upper]) if lower.is_finite() && upper.is_finite() => upper - lower,
            _ => 1.0,
        }
    }

    /// All voltage samples across all cycles, flattened in cycle order.
    pub fn all_voltages(&self) -> impl Iterator<Item = f64> + '_ {
        self.cycle_data
            .iter()
            .flat_map(|c| c.voltage_in_v.iter().copied())
    }

    /// All current samples across all cycles, flattened in cycle order.
    pub fn all_currents(&self) -> impl Iterator<Item = f64> + '_ {
        self.cycle_data
            .iter()
            .flat_map(|c| c.current_in_a.iter().copied())
    }
}
