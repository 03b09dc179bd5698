//! Coupon schedule generation.
//!
//! Dates are unadjusted and rolled backward from maturity, each one a whole
//! number of periods before maturity, so a short stub (if any) falls at the
//! front of the schedule.

use callable_core::types::{Date, Frequency};

use crate::error::{BondError, BondResult};

/// Generates the coupon schedule `[issue, d₁, …, maturity]`.
///
/// With `end_of_month` set and a month-end maturity, every rolled date is
/// snapped to its month end.
pub fn coupon_schedule(
    issue: Date,
    maturity: Date,
    frequency: Frequency,
    end_of_month: bool,
) -> BondResult<Vec<Date>> {
    if maturity <= issue {
        return Err(BondError::invalid_spec(format!(
            "maturity {maturity} must be after issue {issue}"
        )));
    }

    let step = frequency.months_per_period() as i32;
    let snap = end_of_month && maturity.is_end_of_month();

    let mut dates = vec![maturity];
    let mut periods = 1;
    loop {
        let offset = -step * periods;
        let date = if snap {
            maturity.add_months_end_of_month(offset)?
        } else {
            maturity.add_months(offset)?
        };
        if date <= issue {
            break;
        }
        dates.push(date);
        periods += 1;
    }
    dates.push(issue);
    dates.reverse();
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_regular_semiannual() {
        let dates = coupon_schedule(d(2025, 1, 15), d(2030, 1, 15), Frequency::SemiAnnual, false).unwrap();
        assert_eq!(dates.len(), 11);
        assert_eq!(dates[0], d(2025, 1, 15));
        assert_eq!(dates[1], d(2025, 7, 15));
        assert_eq!(dates[10], d(2030, 1, 15));
    }

    #[test]
    fn test_front_stub() {
        let dates = coupon_schedule(d(2025, 3, 1), d(2027, 1, 15), Frequency::SemiAnnual, false).unwrap();
        assert_eq!(dates[0], d(2025, 3, 1));
        assert_eq!(dates[1], d(2025, 7, 15));
        assert_eq!(*dates.last().unwrap(), d(2027, 1, 15));
    }

    #[test]
    fn test_end_of_month_roll() {
        let dates = coupon_schedule(d(2024, 2, 29), d(2026, 8, 31), Frequency::SemiAnnual, true).unwrap();
        assert!(dates.contains(&d(2025, 2, 28)));
        assert!(dates.contains(&d(2026, 2, 28)));
        assert!(dates.contains(&d(2025, 8, 31)));

        // Without the flag the day is only clamped where the month is short.
        let plain = coupon_schedule(d(2024, 2, 29), d(2026, 8, 30), Frequency::SemiAnnual, false).unwrap();
        assert!(plain.contains(&d(2025, 8, 30)));
        assert!(plain.contains(&d(2026, 2, 28)));
    }

    #[test]
    fn test_maturity_before_issue() {
        assert!(coupon_schedule(d(2030, 1, 1), d(2025, 1, 1), Frequency::Annual, false).is_err());
    }

    proptest! {
        #[test]
        fn prop_schedule_strictly_increasing(
            years in 1i32..30,
            offset_days in 0i64..200,
            freq in prop_oneof![
                Just(Frequency::Annual),
                Just(Frequency::SemiAnnual),
                Just(Frequency::Quarterly),
                Just(Frequency::Monthly),
            ],
        ) {
            let maturity = d(2030 + years, 6, 15);
            let issue = d(2030, 6, 15).add_days(offset_days);
            let dates = coupon_schedule(issue, maturity, freq, false).unwrap();
            prop_assert_eq!(dates[0], issue);
            prop_assert_eq!(*dates.last().unwrap(), maturity);
            for w in dates.windows(2) {
                prop_assert!(w[0] < w[1]);
            }
        }
    }
}
