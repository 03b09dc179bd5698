//! Pricer configuration.
//!
//! All numerical knobs live in one serializable struct so a comparison run
//! can be reproduced from a single TOML or JSON file. Every field has a
//! default; a file only needs the values it changes.
//!
//! ```toml
//! oas_bps = 90.0
//! bump_bps = 10.0
//!
//! [mc]
//! paths = 20000
//!
//! [tree]
//! steps_per_year = 104
//! ```

use std::path::Path;

use callable_engines::{McConfig, PdeConfig, TreeConfig};
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, PricerResult};

/// Basis points per unit of rate.
pub const BPS: f64 = 10_000.0;

/// Numerical settings for a pricing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Hull-White Monte Carlo settings.
    #[serde(default)]
    pub mc: McConfig,

    /// CIR PDE settings.
    #[serde(default)]
    pub pde: PdeConfig,

    /// Black-Karasinski tree settings.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Static spread over the risk-free curve, in basis points.
    #[serde(default)]
    pub oas_bps: f64,

    /// Reporting bump, in basis points.
    #[serde(default = "default_bump_bps")]
    pub bump_bps: f64,

    /// Bump for effective duration and convexity; falls back to `bump_bps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_bump_bps: Option<f64>,
}

fn default_bump_bps() -> f64 {
    1.0
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            mc: McConfig::default(),
            pde: PdeConfig::default(),
            tree: TreeConfig::default(),
            oas_bps: 0.0,
            bump_bps: default_bump_bps(),
            risk_bump_bps: None,
        }
    }
}

impl PricerConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> PricerResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> PricerResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> PricerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Sets the Monte Carlo settings.
    #[must_use]
    pub fn with_mc(mut self, mc: McConfig) -> Self {
        self.mc = mc;
        self
    }

    /// Sets the PDE settings.
    #[must_use]
    pub fn with_pde(mut self, pde: PdeConfig) -> Self {
        self.pde = pde;
        self
    }

    /// Sets the tree settings.
    #[must_use]
    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    /// Sets the risk bump in basis points.
    #[must_use]
    pub fn with_risk_bump_bps(mut self, bps: f64) -> Self {
        self.risk_bump_bps = Some(bps);
        self
    }

    /// OAS as a decimal rate.
    pub fn oas(&self) -> f64 {
        self.oas_bps / BPS
    }

    /// Risk bump as a decimal rate.
    pub fn risk_bump(&self) -> f64 {
        self.risk_bump_bps.unwrap_or(self.bump_bps) / BPS
    }
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Returns every problem found, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> PricerResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(PricerError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(PricerError::MultipleValidationErrors(errors)),
        }
    }
}

impl Validate for PricerConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.mc.paths < 2 {
            errors.push(ValidationError::new("mc.paths", "must be at least 2"));
        }
        if self.mc.steps_per_year == 0 {
            errors.push(ValidationError::new("mc.steps_per_year", "must be at least 1"));
        }
        if self.pde.grid_size < 3 {
            errors.push(ValidationError::new("pde.grid_size", "must be at least 3"));
        }
        if self.pde.steps_per_year == 0 {
            errors.push(ValidationError::new("pde.steps_per_year", "must be at least 1"));
        }
        if !(self.pde.r_min.is_finite() && self.pde.r_min >= 0.0) {
            errors.push(ValidationError::new("pde.r_min", "must be finite and non-negative"));
        }
        if !(self.pde.r_max.is_finite() && self.pde.r_max > self.pde.r_min) {
            errors.push(ValidationError::new("pde.r_max", "must be finite and above r_min"));
        }
        if self.tree.steps_per_year == 0 {
            errors.push(ValidationError::new("tree.steps_per_year", "must be at least 1"));
        }
        if !self.oas_bps.is_finite() {
            errors.push(ValidationError::new("oas_bps", "must be finite"));
        }
        if !self.bump_bps.is_finite() {
            errors.push(ValidationError::new("bump_bps", "must be finite"));
        }
        if self.risk_bump_bps.is_some_and(|b| !b.is_finite()) {
            errors.push(ValidationError::new("risk_bump_bps", "must be finite"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = PricerConfig::default();
        assert_eq!(config.mc.paths, 50_000);
        assert_eq!(config.pde.grid_size, 800);
        assert_eq!(config.tree.steps_per_year, 52);
        assert_relative_eq!(config.risk_bump(), 0.0001);
        assert_relative_eq!(config.oas(), 0.0);
        assert!(config.is_valid());
    }

    #[test]
    fn test_risk_bump_falls_back_to_bump() {
        let config = PricerConfig {
            bump_bps: 10.0,
            ..PricerConfig::default()
        };
        assert_relative_eq!(config.risk_bump(), 0.001);
        assert_relative_eq!(config.with_risk_bump_bps(5.0).risk_bump(), 0.0005);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = PricerConfig::from_toml_str(
            r#"
            oas_bps = 90.0
            bump_bps = 10.0

            [mc]
            paths = 20000

            [pde]
            shift_theta_with_curve = false
            "#,
        )
        .unwrap();
        assert_relative_eq!(config.oas(), 0.009);
        assert_eq!(config.mc.paths, 20_000);
        assert_eq!(config.mc.seed, 12_345);
        assert!(!config.pde.shift_theta_with_curve);
        assert_eq!(config.pde.grid_size, 800);
        assert_eq!(config.tree, TreeConfig::default());
    }

    #[test]
    fn test_from_json() {
        let config = PricerConfig::from_json_str(r#"{"risk_bump_bps": 25, "tree": {"steps_per_year": 12}}"#).unwrap();
        assert_relative_eq!(config.risk_bump(), 0.0025);
        assert_eq!(config.tree.steps_per_year, 12);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            PricerConfig::from_toml_str("oas_bps = \"wide\""),
            Err(PricerError::Deserialization(_))
        ));
        assert!(matches!(
            PricerConfig::from_file("/nonexistent/callable.toml"),
            Err(PricerError::Io(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = PricerConfig::default();
        config.pde.grid_size = 2;
        assert!(matches!(
            config.validate_or_error(),
            Err(PricerError::Validation { ref field, .. }) if field == "pde.grid_size"
        ));

        config.mc.paths = 1;
        config.pde.r_max = 0.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            config.validate_or_error(),
            Err(PricerError::MultipleValidationErrors(_))
        ));
    }
}
