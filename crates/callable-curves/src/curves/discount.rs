use callable_math::interpolation::interp_clamped;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::traits::{check_time, YieldCurve};

/// A curve defined by discount factor pillars.
///
/// Interpolation is linear in `ln DF` (piecewise flat forwards). A pillar at
/// `t = 0` with `DF = 1` is implied. Beyond the last pillar the final
/// segment's forward rate is extended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurve {
    times: Vec<f64>,
    log_dfs: Vec<f64>,
}

impl DiscountCurve {
    /// Builds a curve from `(time, discount factor)` pillars.
    ///
    /// Times must be positive and strictly increasing; discount factors must
    /// be positive and finite.
    pub fn new(pillars: &[(f64, f64)]) -> CurveResult<Self> {
        if pillars.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let mut times = Vec::with_capacity(pillars.len() + 1);
        let mut log_dfs = Vec::with_capacity(pillars.len() + 1);
        times.push(0.0);
        log_dfs.push(0.0);

        for (index, &(t, df)) in pillars.iter().enumerate() {
            check_time(t)?;
            let prev = times[times.len() - 1];
            if t <= prev {
                return Err(CurveError::NonMonotonicTenors {
                    index,
                    prev,
                    current: t,
                });
            }
            if !(df.is_finite() && df > 0.0) {
                return Err(CurveError::invalid_value(format!(
                    "discount factor {df} at t = {t}"
                )));
            }
            times.push(t);
            log_dfs.push(df.ln());
        }

        Ok(Self { times, log_dfs })
    }

    /// Builds a curve from continuously compounded zero rates.
    pub fn from_zero_rates(pillars: &[(f64, f64)]) -> CurveResult<Self> {
        let dfs: Vec<(f64, f64)> = pillars.iter().map(|&(t, r)| (t, (-r * t).exp())).collect();
        Self::new(&dfs)
    }

    /// Pillar times, including the implied origin.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    fn log_df(&self, t: f64) -> f64 {
        let n = self.times.len();
        let t_last = self.times[n - 1];
        if t <= t_last {
            return interp_clamped(t, &self.times, &self.log_dfs);
        }
        let slope = (self.log_dfs[n - 1] - self.log_dfs[n - 2]) / (t_last - self.times[n - 2]);
        self.log_dfs[n - 1] + slope * (t - t_last)
    }
}

impl YieldCurve for DiscountCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(self.log_df(t).exp())
    }
}
