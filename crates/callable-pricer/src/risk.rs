//! Effective duration and convexity from symmetric curve bumps.
//!
//! ```text
//! D_eff = (P₋ - P₊) / (2 × P₀ × Δy)
//! C_eff = (P₊ + P₋ - 2×P₀) / (P₀ × Δy²)
//! ```
//!
//! where `P₊` and `P₋` are clean prices after a parallel shift of `+Δy` and
//! `-Δy` of the continuously compounded curve.

use serde::{Deserialize, Serialize};

/// Base prices at or below this carry no meaningful sensitivity.
pub const DEGENERATE_PRICE: f64 = 1e-8;

/// Bumps smaller than this are treated as zero.
pub const MIN_BUMP: f64 = 1e-12;

/// Clean price with its effective risk measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Base clean price.
    pub price: f64,
    /// Effective duration, in years.
    pub effective_duration: f64,
    /// Effective convexity.
    pub effective_convexity: f64,
}

impl RiskMetrics {
    /// Metrics of a zero-priced instrument.
    pub fn degenerate() -> Self {
        Self {
            price: 0.0,
            effective_duration: 0.0,
            effective_convexity: 0.0,
        }
    }

    /// A price with no sensitivity attached.
    pub fn price_only(price: f64) -> Self {
        Self {
            price,
            effective_duration: 0.0,
            effective_convexity: 0.0,
        }
    }

    /// Combines the base and bumped prices.
    pub fn from_bumps(price_base: f64, price_up: f64, price_down: f64, bump: f64) -> Self {
        if price_base <= DEGENERATE_PRICE {
            return Self::degenerate();
        }
        if bump.abs() < MIN_BUMP {
            return Self::price_only(price_base);
        }
        Self {
            price: price_base,
            effective_duration: effective_duration(price_up, price_down, price_base, bump),
            effective_convexity: effective_convexity(price_up, price_down, price_base, bump),
        }
    }
}

/// Central-difference duration. The caller guarantees a non-zero base and bump.
pub fn effective_duration(price_up: f64, price_down: f64, price_base: f64, bump: f64) -> f64 {
    (price_down - price_up) / (2.0 * price_base * bump)
}

/// Central-difference convexity. The caller guarantees a non-zero base and bump.
pub fn effective_convexity(price_up: f64, price_down: f64, price_base: f64, bump: f64) -> f64 {
    (price_up + price_down - 2.0 * price_base) / (price_base * bump * bump)
}
