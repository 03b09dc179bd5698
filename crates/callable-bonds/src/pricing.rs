//! Straight-bond discounting.

use callable_curves::{CurveHandle, YieldCurve};
use serde::{Deserialize, Serialize};

use crate::error::BondResult;
use crate::geometry::BondGeometry;

/// Dirty value of the remaining cashflows with all call rights ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StraightBondPrice {
    /// Present value of the cashflows.
    pub dirty: f64,
    /// Macaulay duration of the cashflows under the same discounting, in years.
    pub macaulay_duration: f64,
}

/// Discounts every remaining cashflow on `curve`.
pub fn straight_dirty_price(
    geometry: &BondGeometry,
    curve: &CurveHandle,
) -> BondResult<StraightBondPrice> {
    let mut dirty = 0.0;
    let mut weighted = 0.0;
    for cf in &geometry.cashflows {
        let pv = cf.amount * curve.discount_factor(cf.time)?;
        dirty += pv;
        weighted += cf.time * pv;
    }
    let macaulay_duration = if dirty > 0.0 { weighted / dirty } else { 0.0 };
    Ok(StraightBondPrice {
        dirty,
        macaulay_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cashflow;
    use approx::assert_relative_eq;
    use callable_core::types::Date;

    #[test]
    fn test_zero_coupon() {
        let date = Date::from_ymd(2035, 1, 1).unwrap();
        let geometry = BondGeometry {
            maturity: 10.0,
            coupon_amount: 0.0,
            redemption: 100.0,
            cashflows: vec![Cashflow {
                date,
                time: 10.0,
                amount: 100.0,
            }],
            calls: vec![],
        };
        let price = straight_dirty_price(&geometry, &CurveHandle::flat(0.05).unwrap()).unwrap();
        assert_relative_eq!(price.dirty, 100.0 * (-0.5_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(price.macaulay_duration, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_par_bond_near_par() {
        // Annual 5% coupon discounted at ln(1.05) prices at exactly par.
        let date = Date::from_ymd(2030, 1, 1).unwrap();
        let cashflows = (1..=5)
            .map(|i| Cashflow {
                date,
                time: f64::from(i),
                amount: if i == 5 { 105.0 } else { 5.0 },
            })
            .collect();
        let geometry = BondGeometry {
            maturity: 5.0,
            coupon_amount: 5.0,
            redemption: 100.0,
            cashflows,
            calls: vec![],
        };
        let curve = CurveHandle::flat(1.05_f64.ln()).unwrap();
        let price = straight_dirty_price(&geometry, &curve).unwrap();
        assert_relative_eq!(price.dirty, 100.0, epsilon = 1e-10);
    }
}
