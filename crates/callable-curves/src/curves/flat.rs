//! Flat continuously compounded curve.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::traits::{check_time, YieldCurve};

/// A curve with a single continuously compounded rate at every tenor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatCurve {
    rate: f64,
}

impl FlatCurve {
    /// Creates a flat curve. Fails if `rate` is not finite.
    pub fn new(rate: f64) -> CurveResult<Self> {
        if !rate.is_finite() {
            return Err(CurveError::invalid_value(format!("flat rate {rate}")));
        }
        Ok(Self { rate })
    }

    /// The continuously compounded rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl YieldCurve for FlatCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok((-self.rate * t.max(0.0)).exp())
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.rate)
    }

    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        check_time(t1)?;
        check_time(t2)?;
        Ok(self.rate)
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_curve() {
        let curve = FlatCurve::new(0.04).unwrap();
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor(-1.0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor(10.0).unwrap(), (-0.4_f64).exp());
        assert_relative_eq!(curve.zero_rate(7.0).unwrap(), 0.04);
        assert_relative_eq!(curve.forward_rate(1.0, 1.001).unwrap(), 0.04);
    }

    #[test]
    fn test_rejects_nan() {
        assert!(FlatCurve::new(f64::NAN).is_err());
    }

    #[test]
    fn test_serde() {
        let curve = FlatCurve::new(0.035).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let back: FlatCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(curve, back);
    }
}
