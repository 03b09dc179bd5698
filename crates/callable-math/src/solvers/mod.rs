//! Root-finding algorithms.
//!
//! Only a bracketing method is needed by the engines: the tree's forward
//! calibration searches a fixed level interval at every step, and the caller
//! decides what to do when the interval does not bracket a root.

mod brent;

pub use brent::brent;

/// Bracket width at which a search stops.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Iteration budget of a search.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Stopping rule for a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on the bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root.
    pub root: f64,
    /// Iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}
