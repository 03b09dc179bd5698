//! Core trait for yield curve operations.
//!
//! All rates are continuously compounded and all times are year fractions
//! measured from the curve's valuation date.

use std::fmt::Debug;

use crate::error::{CurveError, CurveResult};

/// Step used when a rate has to be read off the discount function at `t = 0`.
const SHORT_END_STEP: f64 = 1e-4;

/// A term structure of discount factors.
///
/// # Required Methods
///
/// - [`discount_factor`](YieldCurve::discount_factor)
///
/// # Derived Methods
///
/// Zero, forward and instantaneous forward rates default to the values
/// implied by the discount function. Implementations with a closed form
/// should override them.
pub trait YieldCurve: Debug + Send + Sync {
    /// Returns the discount factor from the valuation date to time `t`.
    ///
    /// Returns 1.0 for `t ≤ 0`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Continuously compounded zero rate to time `t`.
    ///
    /// At `t ≤ 0` this is the short end of the curve, read over a small step.
    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        let t = if t > 0.0 { t } else { SHORT_END_STEP };
        let df = self.discount_factor(t)?;
        log_ratio(1.0, df).map(|l| l / t)
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    ///
    /// `F(t1, t2) = ln(DF(t1) / DF(t2)) / (t2 - t1)`. Returns the
    /// instantaneous forward at `t1` when the interval is empty.
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        check_time(t1)?;
        check_time(t2)?;
        if t2 <= t1 {
            return self.instantaneous_forward(t1);
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        log_ratio(df1, df2).map(|l| l / (t2 - t1))
    }

    /// Instantaneous forward rate `f(t) = -d ln DF(t) / dt`.
    ///
    /// Uses a one-sided difference of width 1e-4 years.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        let t = t.max(0.0);
        let df = self.discount_factor(t)?;
        let df_plus = self.discount_factor(t + SHORT_END_STEP)?;
        log_ratio(df, df_plus).map(|l| l / SHORT_END_STEP)
    }
}

pub(crate) fn check_time(t: f64) -> CurveResult<()> {
    if t.is_finite() {
        Ok(())
    } else {
        Err(CurveError::InvalidTime { t })
    }
}

fn log_ratio(num: f64, den: f64) -> CurveResult<f64> {
    if num <= 0.0 || den <= 0.0 {
        return Err(CurveError::invalid_value(format!(
            "non-positive discount factor ({num}, {den})"
        )));
    }
    Ok((num / den).ln())
}
