//! Day count conventions.
//!
//! The engines measure time in the bond's day-count year fraction from the
//! valuation date, so the convention chosen here fixes the position of every
//! cashflow and exercise date on the pricing grid.
//!
//! - [`Thirty360US`]: 30/360 US bond basis (default for USD corporates)
//! - [`Act360`]: Actual/360
//! - [`Act365Fixed`]: Actual/365 Fixed

mod act;
mod thirty360;

pub use act::{Act360, Act365Fixed};
pub use thirty360::Thirty360US;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates (negative if `end < start`).
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime-selectable day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// 30/360 US (Bond Basis)
    #[default]
    Thirty360US,
}

impl DayCountConvention {
    /// Converts to a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
        }
    }

    /// Year fraction as `Decimal`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.to_day_count().year_fraction(start, end)
    }

    /// Year fraction as `f64`, the unit of the engines' time axis.
    #[must_use]
    pub fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }

    /// Returns the convention name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.to_day_count().name()
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(' ', "").as_str() {
            "ACT/360" | "ACTUAL/360" | "A360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACTUAL/365FIXED" | "A365F" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "30/360" | "30/360US" | "30U/360" | "BONDBASIS" => Ok(DayCountConvention::Thirty360US),
            _ => Err(CoreError::UnsupportedConvention { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "30/360 US".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Thirty360US
        );
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert!("ACT/ACT".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_year_fraction_f64() {
        let start = Date::from_ymd(2025, 12, 2).unwrap();
        let end = Date::from_ymd(2035, 12, 2).unwrap();
        assert_relative_eq!(
            DayCountConvention::Thirty360US.year_fraction_f64(start, end),
            10.0,
            epsilon = 1e-12
        );
    }
}
