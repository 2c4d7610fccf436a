//! State-of-health series construction.
//!
//! SOH for a cycle is the maximum discharge capacity of that cycle divided by
//! the nominal capacity and the usable SOC window width. The series is
//! recomputed on each request and index-aligned 1:1 with the record set's
//! cycle data.

use serde::{Deserialize, Serialize};

use crate::datasets::NominalCapacityTable;
use crate::error::{CellRsError, Result};
use crate::models::BatteryRecordSet;

/// Per-cycle SOH values together with the scalars they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SohSeries {
    /// One SOH value per cycle, in temporal order
    pub values: Vec<f64>,

    /// Nominal capacity the series was normalized against, in ampere-hours
    pub nominal_capacity_in_ah: f64,

    /// SOC window width the series was normalized against
    pub soc_interval_width: f64,
}

impl SohSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Builds SOH series from battery record sets.
pub struct SohSeriesBuilder {
    capacity_table: NominalCapacityTable,
}

impl SohSeriesBuilder {
    pub fn new() -> Self {
        SohSeriesBuilder {
            capacity_table: NominalCapacityTable::default(),
        }
    }

    pub fn with_capacity_table(capacity_table: NominalCapacityTable) -> Self {
        SohSeriesBuilder { capacity_table }
    }

    /// Compute the SOH series for a record set.
    ///
    /// `file_name` drives the legacy-dataset capacity lookup and takes
    /// precedence over the record set's own `nominal_capacity_in_Ah` field.
    /// Cycles without discharge capacity contribute an SOH of 0.
    pub fn build(&self, set: &BatteryRecordSet, file_name: Option<&str>) -> Result<SohSeries> {
        set.validate()?;

        let nominal_capacity = self.resolve_nominal_capacity(set, file_name)?;
        let soc_width = set.soc_interval_width();

        let values: Vec<f64> = set
            .cycle_data
            .iter()
            .map(|cycle| {
                let qd = cycle.max_discharge_capacity().unwrap_or(0.0);
                qd / nominal_capacity / soc_width
            })
            .collect();

        tracing::debug!(
            cycles = values.len(),
            nominal_capacity_in_ah = nominal_capacity,
            soc_interval_width = soc_width,
            "built SOH series"
        );

        Ok(SohSeries {
            values,
            nominal_capacity_in_ah: nominal_capacity,
            soc_interval_width: soc_width,
        })
    }

    /// Resolution order: legacy file-name prefix, then the explicit metadata
    /// field, then failure.
    fn resolve_nominal_capacity(
        &self,
        set: &BatteryRecordSet,
        file_name: Option<&str>,
    ) -> Result<f64> {
        if let Some(name) = file_name {
            if let Some(capacity) = self.capacity_table.lookup(name) {
                tracing::debug!(file = name, capacity, "nominal capacity from dataset prefix");
                return Ok(capacity);
            }
        }

        set.nominal_capacity_in_ah.ok_or_else(|| {
            CellRsError::Configuration("cannot determine nominal capacity".to_string())
        })
    }
}

impl Default for SohSeriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
