//! End-of-life estimation from an SOH series.
//!
//! The policy has three branches keyed off the last observed SOH:
//! - at or above the exclusion threshold the cell has not degraded enough to
//!   estimate anything (not an error);
//! - in the narrow band just above the EOL threshold, a regression over the
//!   trailing window extrapolates the crossing cycle;
//! - at or below the EOL threshold, the first observed crossing is the answer.

use serde::{Deserialize, Serialize};

use crate::error::{CellRsError, Result};
use crate::regression::LinearFit;
use crate::soh::SohSeries;

/// How an EOL estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EolMethod {
    /// Last SOH at/above the exclusion threshold; no EOL within the window
    Excluded,
    /// Extrapolated from a trailing-window regression
    Regression,
    /// First observed cycle with SOH at/below the EOL threshold
    FirstCrossing,
}

impl std::fmt::Display for EolMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EolMethod::Excluded => "excluded",
            EolMethod::Regression => "regression",
            EolMethod::FirstCrossing => "first-crossing",
        };
        f.write_str(s)
    }
}

/// EOL estimate for one SOH series. Immutable result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EolEstimate {
    /// Estimated end-of-life cycle index (1-based), None when excluded
    pub eol: Option<i64>,

    /// Branch that produced the estimate
    pub method: EolMethod,

    /// Un-floored regression prediction, present only for the regression branch
    pub eol_pred_float: Option<f64>,

    /// Last observed SOH value
    pub last_soh: f64,

    /// Number of recorded cycles (1-based count)
    pub last_cycle: u32,
}

/// EOL estimator configuration with customizable thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EolConfig {
    /// SOH defining end of life (default: 0.80)
    pub eol_soh_threshold: f64,

    /// Last-SOH level at/above which the cell is excluded from estimation
    /// (default: 0.825)
    pub exclusion_soh_threshold: f64,

    /// Trailing window length for the regression branch (default: 20)
    pub regression_window: usize,
}

impl Default for EolConfig {
    fn default() -> Self {
        EolConfig {
            eol_soh_threshold: 0.80,
            exclusion_soh_threshold: 0.825,
            regression_window: 20,
        }
    }
}

/// Three-branch EOL estimation engine. Pure function of the SOH series.
pub struct EolEstimator {
    config: EolConfig,
}

impl EolEstimator {
    pub fn new() -> Self {
        EolEstimator {
            config: EolConfig::default(),
        }
    }

    pub fn with_config(config: EolConfig) -> Self {
        EolEstimator { config }
    }

    /// Estimate EOL for an SOH series.
    ///
    /// An empty series is a precondition violation; everything else resolves
    /// through one of the three branches without failing.
    pub fn estimate(&self, series: &SohSeries) -> Result<EolEstimate> {
        self.estimate_values(&series.values)
    }

    /// Estimate EOL from raw SOH values.
    pub fn estimate_values(&self, soh: &[f64]) -> Result<EolEstimate> {
        let last_soh = *soh.last().ok_or_else(|| {
            CellRsError::InvalidInput("cannot estimate EOL from an empty SOH series".to_string())
        })?;
        let last_cycle = soh.len() as u32;

        if last_soh >= self.config.exclusion_soh_threshold {
            tracing::debug!(last_soh, "last SOH above exclusion threshold, no EOL");
            return Ok(EolEstimate {
                eol: None,
                method: EolMethod::Excluded,
                eol_pred_float: None,
                last_soh,
                last_cycle,
            });
        }

        if last_soh > self.config.eol_soh_threshold {
            return Ok(self.estimate_by_regression(soh, last_soh, last_cycle));
        }

        // Guaranteed to find a crossing: the last element already qualifies.
        let eol = soh
            .iter()
            .position(|&s| s <= self.config.eol_soh_threshold)
            .map(|idx| idx as i64 + 1);

        Ok(EolEstimate {
            eol,
            method: EolMethod::FirstCrossing,
            eol_pred_float: None,
            last_soh,
            last_cycle,
        })
    }

    /// Regress cycle index on SOH over the trailing window and evaluate the
    /// line at the EOL threshold.
    ///
    /// The axes are inverted relative to the usual SOH-vs-cycle convention on
    /// purpose: with SOH as the predictor the fitted line answers "which
    /// cycle index does SOH = 0.80 correspond to" directly.
    fn estimate_by_regression(&self, soh: &[f64], last_soh: f64, last_cycle: u32) -> EolEstimate {
        let window = self.config.regression_window.min(soh.len());
        let start = soh.len() - window;

        let xs = &soh[start..];
        let ys: Vec<f64> = (start..soh.len()).map(|i| (i + 1) as f64).collect();

        // The window has at least one point and LinearFit degrades to the
        // minimum-norm solution on zero variance, so a fit of a single point
        // is the only residual edge; treat it like a flat line through it.
        let eol_pred = match LinearFit::fit(xs, &ys) {
            Some(fit) => fit.predict(self.config.eol_soh_threshold),
            None => ys[0],
        };

        tracing::debug!(window, eol_pred, "regression branch EOL prediction");

        EolEstimate {
            eol: Some(eol_pred.floor() as i64),
            method: EolMethod::Regression,
            eol_pred_float: Some(eol_pred),
            last_soh,
            last_cycle,
        }
    }
}

impl Default for EolEstimator {
    fn default() -> Self {
        Self::new()
    }
}
