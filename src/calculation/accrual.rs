//! Annual leave accrual.
//!
//! The entitlement for a year depends on where the hire date falls relative to it:
//!
//! - hire year: `base` pro-rated by the days worked through December 31
//!   (inclusive of both ends) over a fixed 365-day year;
//! - later years: `base + seniority * increment`, capped at `max`, where seniority
//!   is `year - (hire_year + 1)` so the bonus starts in the second full year;
//! - years before hire: `base` unchanged.
//!
//! Every branch rounds to 2 decimal places, half away from zero.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::AccrualParameters;

/// Days in the pro-rating divisor. Leap years are deliberately not adjusted.
pub const DAYS_PER_ACCRUAL_YEAR: i64 = 365;

/// Rounds a day count to 2 decimal places, half away from zero.
pub fn round_days(days: Decimal) -> Decimal {
    days.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the annual-leave entitlement for `year`.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::compute_annual_accrual;
/// use leave_engine::models::AccrualParameters;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let params = AccrualParameters::new(
///     Decimal::from_str("7.5").unwrap(),
///     Decimal::from_str("1.0").unwrap(),
///     Decimal::from_str("16.5").unwrap(),
///     NaiveDate::from_ymd_opt(2022, 11, 1).unwrap(),
/// )
/// .unwrap();
///
/// // Hire year: 61 days worked
/// assert_eq!(compute_annual_accrual(2022, &params), Decimal::from_str("1.25").unwrap());
/// // Two years of seniority
/// assert_eq!(compute_annual_accrual(2025, &params), Decimal::from_str("9.5").unwrap());
/// ```
pub fn compute_annual_accrual(year: i32, params: &AccrualParameters) -> Decimal {
    let hire_year = params.hire_date.year();

    if hire_year == year {
        let days_worked = days_through_year_end(params.hire_date);
        let fraction = Decimal::from(days_worked) / Decimal::from(DAYS_PER_ACCRUAL_YEAR);
        return round_days(params.base_days_per_year * fraction);
    }

    if hire_year < year {
        let seniority = (year - (hire_year + 1)).max(0);
        // An overflowing bonus is necessarily above the cap
        let accrued = Decimal::from(seniority)
            .checked_mul(params.seniority_increment_per_year)
            .and_then(|bonus| params.base_days_per_year.checked_add(bonus))
            .map_or(params.max_days_per_year, |days| days.min(params.max_days_per_year));
        return round_days(accrued);
    }

    round_days(params.base_days_per_year)
}

/// Days from `date` through December 31 of its year, counting both ends.
fn days_through_year_end(date: NaiveDate) -> i64 {
    NaiveDate::from_ymd_opt(date.year(), 12, 31)
        .map(|year_end| (year_end - date).num_days() + 1)
        .unwrap_or(1)
}
