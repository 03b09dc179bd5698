//! Model parameter sets.
//!
//! Parameters come from an external calibration step; the engines only
//! check that they are usable and never substitute defaults.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn check_volatility(sigma: f64) -> EngineResult<()> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            "sigma",
            sigma,
            "must be finite and positive",
        ))
    }
}

fn check_mean_reversion(name: &'static str, a: f64) -> EngineResult<()> {
    if a.is_finite() && a >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            name,
            a,
            "must be finite and non-negative",
        ))
    }
}

/// Hull-White one-factor parameters: `dr = (θ(t) - a·r)dt + σ·dW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullWhiteParams {
    /// Mean reversion speed `a`. Zero gives driftless Gaussian dynamics.
    #[serde(alias = "a")]
    pub mean_reversion: f64,
    /// Short rate volatility `σ` (absolute, 0.01 = 100bp).
    #[serde(alias = "sigma")]
    pub volatility: f64,
}

impl HullWhiteParams {
    /// Creates a parameter set.
    #[must_use]
    pub fn new(mean_reversion: f64, volatility: f64) -> Self {
        Self {
            mean_reversion,
            volatility,
        }
    }

    /// Rejects non-finite values, negative `a` and non-positive `σ`.
    pub fn validate(&self) -> EngineResult<()> {
        check_mean_reversion("a", self.mean_reversion)?;
        check_volatility(self.volatility)
    }

    /// The same parameters with `σ` multiplied by `factor`.
    #[must_use]
    pub fn with_scaled_volatility(&self, factor: f64) -> Self {
        Self {
            volatility: self.volatility * factor,
            ..*self
        }
    }
}

/// Cox-Ingersoll-Ross parameters: `dr = k(θ - r)dt + σ√r·dW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirParams {
    /// Long-run mean `θ`.
    #[serde(alias = "theta")]
    pub long_run_mean: f64,
    /// Mean reversion speed `k`.
    #[serde(alias = "k")]
    pub speed: f64,
    /// Volatility `σ`.
    #[serde(alias = "sigma")]
    pub volatility: f64,
}

impl CirParams {
    /// Creates a parameter set.
    #[must_use]
    pub fn new(long_run_mean: f64, speed: f64, volatility: f64) -> Self {
        Self {
            long_run_mean,
            speed,
            volatility,
        }
    }

    /// Rejects a non-finite `θ`, negative `k` and non-positive `σ`.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.long_run_mean.is_finite() {
            return Err(EngineError::invalid_parameter(
                "theta",
                self.long_run_mean,
                "must be finite",
            ));
        }
        check_mean_reversion("k", self.speed)?;
        check_volatility(self.volatility)
    }

    /// The same parameters with `σ` multiplied by `factor`.
    #[must_use]
    pub fn with_scaled_volatility(&self, factor: f64) -> Self {
        Self {
            volatility: self.volatility * factor,
            ..*self
        }
    }
}

/// Black-Karasinski parameters: `d ln r = (θ(t) - a·ln r)dt + σ·dW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackKarasinskiParams {
    /// Mean reversion speed `a` of the log rate.
    #[serde(alias = "a")]
    pub mean_reversion: f64,
    /// Volatility `σ` of the log rate.
    #[serde(alias = "sigma")]
    pub volatility: f64,
}

impl BlackKarasinskiParams {
    /// Creates a parameter set.
    #[must_use]
    pub fn new(mean_reversion: f64, volatility: f64) -> Self {
        Self {
            mean_reversion,
            volatility,
        }
    }

    /// Rejects non-finite values, negative `a` and non-positive `σ`.
    pub fn validate(&self) -> EngineResult<()> {
        check_mean_reversion("a", self.mean_reversion)?;
        check_volatility(self.volatility)
    }

    /// The same parameters with `σ` multiplied by `factor`.
    #[must_use]
    pub fn with_scaled_volatility(&self, factor: f64) -> Self {
        Self {
            volatility: self.volatility * factor,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_white_validation() {
        assert!(HullWhiteParams::new(0.03, 0.01).validate().is_ok());
        assert!(HullWhiteParams::new(0.0, 0.01).validate().is_ok());
        assert!(HullWhiteParams::new(-0.1, 0.01).validate().is_err());
        assert!(HullWhiteParams::new(0.03, 0.0).validate().is_err());
        assert!(HullWhiteParams::new(0.03, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_cir_validation() {
        assert!(CirParams::new(0.04, 0.1, 0.05).validate().is_ok());
        assert!(CirParams::new(f64::INFINITY, 0.1, 0.05).validate().is_err());
        assert!(CirParams::new(0.04, -0.1, 0.05).validate().is_err());
        assert!(matches!(
            CirParams::new(0.04, 0.1, -0.05).validate(),
            Err(EngineError::InvalidParameter { name: "sigma", .. })
        ));
    }

    #[test]
    fn test_black_karasinski_validation() {
        assert!(BlackKarasinskiParams::new(0.03, 0.2).validate().is_ok());
        assert!(BlackKarasinskiParams::new(0.03, -0.2).validate().is_err());
    }

    #[test]
    fn test_scaled_volatility() {
        let p = HullWhiteParams::new(0.03, 0.01).with_scaled_volatility(1.5);
        assert!((p.volatility - 0.015).abs() < 1e-15);
        assert!((p.mean_reversion - 0.03).abs() < 1e-15);
    }

    #[test]
    fn test_serde_aliases() {
        let p: HullWhiteParams = serde_json::from_str(r#"{"a": 0.03, "sigma": 0.01}"#).unwrap();
        assert_eq!(p, HullWhiteParams::new(0.03, 0.01));
        let c: CirParams = serde_json::from_str(r#"{"theta": 0.04, "k": 0.2, "sigma": 0.05}"#).unwrap();
        assert_eq!(c, CirParams::new(0.04, 0.2, 0.05));
    }
}
