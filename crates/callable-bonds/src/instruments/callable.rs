//! Callable fixed-coupon bond.

use callable_core::daycounts::DayCountConvention;
use callable_core::types::{Date, Frequency};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};
use crate::geometry::{BondGeometry, CallEvent, Cashflow};
use crate::schedule::coupon_schedule;

/// A Bermudan call right: the issuer may redeem on `date` at the clean `price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallEntry {
    /// Exercise date.
    pub date: Date,
    /// Clean call price per the bond's face (100.0 = par on a face of 100).
    pub price: f64,
}

impl CallEntry {
    /// Creates a new call entry.
    #[must_use]
    pub fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }
}

/// A fixed-coupon bond with an optional Bermudan call schedule.
///
/// The coupon paid each period is the regular amount
/// `face · coupon_rate / periods_per_year`; stub periods are not prorated.
/// An empty call schedule describes a straight bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableBondSpec {
    face: Decimal,
    coupon_rate: Decimal,
    frequency: Frequency,
    issue_date: Date,
    maturity_date: Date,
    calls: Vec<CallEntry>,
    day_count: DayCountConvention,
    end_of_month: bool,
    redemption: Decimal,
}

impl CallableBondSpec {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> CallableBondSpecBuilder {
        CallableBondSpecBuilder::default()
    }

    /// Face amount.
    pub fn face(&self) -> Decimal {
        self.face
    }

    /// Annual coupon rate as a decimal (0.035 = 3.5%).
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Coupon frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Issue date.
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Call schedule, sorted by date.
    pub fn calls(&self) -> &[CallEntry] {
        &self.calls
    }

    /// Day count used for accrual and for the engines' time axis.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Redemption amount paid at maturity.
    pub fn redemption(&self) -> Decimal {
        self.redemption
    }

    /// Whether any call right exists.
    pub fn is_callable(&self) -> bool {
        !self.calls.is_empty()
    }

    /// The same bond with its call schedule removed.
    #[must_use]
    pub fn without_calls(&self) -> Self {
        Self {
            calls: Vec::new(),
            ..self.clone()
        }
    }

    /// The fixed coupon paid each period.
    pub fn coupon_amount(&self) -> Decimal {
        self.face * self.coupon_rate / Decimal::from(self.frequency.periods_per_year())
    }

    /// Unadjusted coupon schedule, issue date first.
    pub fn schedule(&self) -> BondResult<Vec<Date>> {
        coupon_schedule(
            self.issue_date,
            self.maturity_date,
            self.frequency,
            self.end_of_month,
        )
    }

    /// Interest accrued since the last schedule date on or before `valuation`.
    ///
    /// Zero before issue, on a payment date, and on or after maturity.
    pub fn accrued_interest(&self, valuation: Date) -> BondResult<Decimal> {
        if valuation <= self.issue_date || valuation >= self.maturity_date {
            return Ok(Decimal::ZERO);
        }
        let schedule = self.schedule()?;
        let previous = schedule
            .iter()
            .rev()
            .find(|d| **d <= valuation)
            .copied()
            .unwrap_or(self.issue_date);
        let fraction = self.day_count.year_fraction(previous, valuation);
        Ok(self.face * self.coupon_rate * fraction)
    }

    /// Places the future cashflows and calls on the time axis of `valuation`.
    ///
    /// Events strictly after `valuation` are kept; times are year fractions
    /// in the bond's day count.
    pub fn geometry(&self, valuation: Date) -> BondResult<BondGeometry> {
        if valuation >= self.maturity_date {
            return Err(BondError::ValuationAfterMaturity {
                valuation: valuation.to_string(),
                maturity: self.maturity_date.to_string(),
            });
        }

        let coupon = to_f64(self.coupon_amount(), "coupon amount")?;
        let redemption = to_f64(self.redemption, "redemption")?;
        let time = |date: Date| self.day_count.year_fraction_f64(valuation, date);

        let cashflows = self
            .schedule()?
            .into_iter()
            .skip(1)
            .filter(|d| *d > valuation)
            .map(|d| Cashflow {
                date: d,
                time: time(d),
                amount: if d == self.maturity_date {
                    coupon + redemption
                } else {
                    coupon
                },
            })
            .collect();

        let calls = self
            .calls
            .iter()
            .filter(|c| c.date > valuation)
            .map(|c| CallEvent {
                date: c.date,
                time: time(c.date),
                price: c.price,
            })
            .collect();

        Ok(BondGeometry {
            maturity: time(self.maturity_date),
            coupon_amount: coupon,
            redemption,
            cashflows,
            calls,
        })
    }
}

fn to_f64(value: Decimal, what: &str) -> BondResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| BondError::invalid_spec(format!("{what} {value} is not representable")))
}

/// Builder for [`CallableBondSpec`].
#[derive(Debug, Clone, Default)]
pub struct CallableBondSpecBuilder {
    face: Option<Decimal>,
    coupon_rate: Option<Decimal>,
    frequency: Option<Frequency>,
    issue_date: Option<Date>,
    maturity_date: Option<Date>,
    calls: Vec<CallEntry>,
    day_count: Option<DayCountConvention>,
    end_of_month: bool,
    redemption: Option<Decimal>,
}

impl CallableBondSpecBuilder {
    /// Sets the face amount.
    #[must_use]
    pub fn face(mut self, face: Decimal) -> Self {
        self.face = Some(face);
        self
    }

    /// Sets the annual coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(mut self, rate: Decimal) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the coupon frequency (default semi-annual).
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Adds a call right.
    #[must_use]
    pub fn add_call(mut self, date: Date, price: f64) -> Self {
        self.calls.push(CallEntry::new(date, price));
        self
    }

    /// Replaces the call schedule.
    #[must_use]
    pub fn calls(mut self, calls: Vec<CallEntry>) -> Self {
        self.calls = calls;
        self
    }

    /// Sets the day count (default 30/360 US).
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Rolls schedule dates on month ends.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Sets the redemption amount (default: face).
    #[must_use]
    pub fn redemption(mut self, redemption: Decimal) -> Self {
        self.redemption = Some(redemption);
        self
    }

    /// Builds the bond.
    pub fn build(self) -> BondResult<CallableBondSpec> {
        let face = self.face.ok_or_else(|| BondError::missing_field("face"))?;
        let coupon_rate = self
            .coupon_rate
            .ok_or_else(|| BondError::missing_field("coupon_rate"))?;
        let issue_date = self
            .issue_date
            .ok_or_else(|| BondError::missing_field("issue_date"))?;
        let maturity_date = self
            .maturity_date
            .ok_or_else(|| BondError::missing_field("maturity_date"))?;

        if face <= Decimal::ZERO {
            return Err(BondError::invalid_spec(format!("face {face} must be positive")));
        }
        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_spec(format!(
                "coupon rate {coupon_rate} must be non-negative"
            )));
        }
        if maturity_date <= issue_date {
            return Err(BondError::invalid_spec(format!(
                "maturity {maturity_date} must be after issue {issue_date}"
            )));
        }

        let mut calls = self.calls;
        if let Some(bad) = calls.iter().find(|c| !(c.price.is_finite() && c.price > 0.0)) {
            return Err(BondError::invalid_spec(format!(
                "call price {} on {} must be positive",
                bad.price, bad.date
            )));
        }
        if let Some(late) = calls.iter().find(|c| c.date >= maturity_date) {
            return Err(BondError::invalid_spec(format!(
                "call date {} is not before maturity {maturity_date}",
                late.date
            )));
        }
        calls.sort_by_key(|c| c.date);

        Ok(CallableBondSpec {
            face,
            coupon_rate,
            frequency: self.frequency.unwrap_or_default(),
            issue_date,
            maturity_date,
            calls,
            day_count: self.day_count.unwrap_or_default(),
            end_of_month: self.end_of_month,
            redemption: self.redemption.unwrap_or(face),
        })
    }
}
