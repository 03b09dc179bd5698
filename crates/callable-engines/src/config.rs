//! Numerical settings for each engine.
//!
//! These are the discretization knobs, independent of model parameters.
//! Defaults reproduce the reference configuration (50,000 paths at 24 steps
//! per year, an 800-node rate grid at 100 steps per year, a weekly tree).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Monte Carlo settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct McConfig {
    /// Number of simulated paths.
    #[serde(default = "default_mc_paths")]
    pub paths: usize,

    /// Time steps per year of maturity.
    #[serde(default = "default_mc_steps_per_year")]
    pub steps_per_year: u32,

    /// Seed of the common random numbers.
    #[serde(default = "default_mc_seed")]
    pub seed: u64,
}

fn default_mc_paths() -> usize {
    50_000
}

fn default_mc_steps_per_year() -> u32 {
    24
}

fn default_mc_seed() -> u64 {
    12_345
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            paths: default_mc_paths(),
            steps_per_year: default_mc_steps_per_year(),
            seed: default_mc_seed(),
        }
    }
}

impl McConfig {
    /// Sets the number of paths.
    #[must_use]
    pub fn with_paths(mut self, paths: usize) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn check(&self) -> EngineResult<()> {
        if self.paths < 2 {
            return Err(EngineError::invalid_config(format!(
                "Monte Carlo needs at least 2 paths, got {}",
                self.paths
            )));
        }
        if self.steps_per_year == 0 {
            return Err(EngineError::invalid_config("Monte Carlo steps per year is zero"));
        }
        Ok(())
    }
}

/// Crank-Nicolson grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdeConfig {
    /// Lowest short rate on the grid.
    #[serde(default = "default_r_min")]
    pub r_min: f64,

    /// Highest short rate on the grid.
    #[serde(default = "default_r_max")]
    pub r_max: f64,

    /// Number of rate nodes.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,

    /// Time steps per year of maturity.
    #[serde(default = "default_pde_steps_per_year")]
    pub steps_per_year: u32,

    /// Move `θ` with the curve's short rate relative to the base run.
    #[serde(default = "default_shift_theta")]
    pub shift_theta_with_curve: bool,
}

fn default_r_min() -> f64 {
    1.0e-5
}

fn default_r_max() -> f64 {
    0.80
}

fn default_grid_size() -> usize {
    800
}

fn default_pde_steps_per_year() -> u32 {
    100
}

fn default_shift_theta() -> bool {
    true
}

impl Default for PdeConfig {
    fn default() -> Self {
        Self {
            r_min: default_r_min(),
            r_max: default_r_max(),
            grid_size: default_grid_size(),
            steps_per_year: default_pde_steps_per_year(),
            shift_theta_with_curve: default_shift_theta(),
        }
    }
}

impl PdeConfig {
    pub(crate) fn check(&self) -> EngineResult<()> {
        if self.grid_size < 3 {
            return Err(EngineError::invalid_config(format!(
                "rate grid needs at least 3 nodes, got {}",
                self.grid_size
            )));
        }
        if !(self.r_min.is_finite() && self.r_max.is_finite() && self.r_min >= 0.0 && self.r_min < self.r_max) {
            return Err(EngineError::invalid_config(format!(
                "rate grid bounds [{}, {}] are not an increasing non-negative range",
                self.r_min, self.r_max
            )));
        }
        if self.steps_per_year == 0 {
            return Err(EngineError::invalid_config("PDE steps per year is zero"));
        }
        Ok(())
    }
}

/// Trinomial tree settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Time steps per year (52 = weekly).
    #[serde(default = "default_tree_steps_per_year")]
    pub steps_per_year: u32,
}

fn default_tree_steps_per_year() -> u32 {
    52
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            steps_per_year: default_tree_steps_per_year(),
        }
    }
}

impl TreeConfig {
    pub(crate) fn check(&self) -> EngineResult<()> {
        if self.steps_per_year == 0 {
            return Err(EngineError::invalid_config("tree steps per year is zero"));
        }
        Ok(())
    }
}
