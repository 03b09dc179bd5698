//! Instrument geometry on the engines' time axis.

use callable_core::types::Date;
use serde::{Deserialize, Serialize};

/// A future payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Payment date.
    pub date: Date,
    /// Year fraction from the valuation date.
    pub time: f64,
    /// Amount paid, including redemption at maturity.
    pub amount: f64,
}

/// A future Bermudan call date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    /// Exercise date.
    pub date: Date,
    /// Year fraction from the valuation date.
    pub time: f64,
    /// Clean call price.
    pub price: f64,
}

/// Cashflows and call rights strictly after a valuation date.
///
/// Both lists are sorted by time. Times are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondGeometry {
    /// Year fraction to maturity.
    pub maturity: f64,
    /// Regular coupon amount.
    pub coupon_amount: f64,
    /// Redemption paid at maturity.
    pub redemption: f64,
    /// Remaining payments.
    pub cashflows: Vec<Cashflow>,
    /// Remaining call dates.
    pub calls: Vec<CallEvent>,
}

impl BondGeometry {
    /// Whether any call right remains.
    pub fn is_callable(&self) -> bool {
        !self.calls.is_empty()
    }

    /// The same payments with every call right dropped.
    #[must_use]
    pub fn without_calls(&self) -> Self {
        Self {
            calls: Vec::new(),
            ..self.clone()
        }
    }

    /// Sum of payments with `from < time ≤ to`.
    pub fn cashflow_in(&self, from: f64, to: f64) -> f64 {
        self.cashflows
            .iter()
            .filter(|cf| from < cf.time && cf.time <= to)
            .map(|cf| cf.amount)
            .sum()
    }
}
