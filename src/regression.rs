//! Ordinary least-squares line fitting.
//!
//! Both regression orientations in the estimation pipeline go through this
//! helper: the EOL estimator fits cycle index on SOH (inverted axes, so the
//! line can be queried directly for "which cycle corresponds to SOH 0.80"),
//! while the cycle-life projection fits discharge capacity on cycle number.

/// A fitted line `y = slope * x + intercept` with its coefficient of
/// determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit a line to paired observations.
    ///
    /// Returns None for fewer than two points or mismatched lengths. When the
    /// predictor has zero variance the minimum-norm least-squares solution is
    /// returned (slope 0, intercept = mean of y), so callers with a
    /// guaranteed-non-empty window never need a failure path.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let mut ss_xx = 0.0;
        let mut ss_xy = 0.0;
        let mut ss_yy = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            ss_xx += dx * dx;
            ss_xy += dx * dy;
            ss_yy += dy * dy;
        }

        if ss_xx == 0.0 {
            return Some(LinearFit {
                slope: 0.0,
                intercept: mean_y,
                r_squared: 0.0,
            });
        }

        let slope = ss_xy / ss_xx;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if ss_yy == 0.0 {
            // y is constant: the fit is exact
            1.0
        } else {
            (ss_xy * ss_xy) / (ss_xx * ss_yy)
        };

        Some(LinearFit {
            slope,
            intercept,
            r_squared,
        })
    }

    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Solve the fitted line for the `x` at which it reaches `y`.
    ///
    /// None when the line is flat.
    pub fn solve_for_x(&self, y: f64) -> Option<f64> {
        if self.slope == 0.0 {
            return None;
        }
        Some((y - self.intercept) / self.slope)
    }
}
