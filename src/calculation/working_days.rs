//! Business-day classification and counting.
//!
//! A date is a working day when its weekday is not designated non-working by the
//! [`WorkingDayPolicy`] and it is not in the holiday set. The holiday set is the
//! union of every language edition, so a date listed by only one edition still
//! counts as a holiday.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{DateSelection, WorkingDayPolicy};

/// Returns true if `date` consumes a day of leave.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::is_working_day;
/// use leave_engine::models::WorkingDayPolicy;
/// use chrono::NaiveDate;
/// use std::collections::HashSet;
///
/// let policy = WorkingDayPolicy::default();
/// let holidays = HashSet::from([NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()]);
///
/// // Saturday is a working day under the default policy
/// assert!(is_working_day(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(), &holidays, &policy));
/// // Sunday is not
/// assert!(!is_working_day(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), &holidays, &policy));
/// // Nor is a public holiday
/// assert!(!is_working_day(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(), &holidays, &policy));
/// ```
pub fn is_working_day(
    date: NaiveDate,
    holidays: &HashSet<NaiveDate>,
    policy: &WorkingDayPolicy,
) -> bool {
    !policy.is_non_working_weekday(date.weekday()) && !holidays.contains(&date)
}

/// Returns the working dates of a selection, ascending.
///
/// # Errors
///
/// [`EngineError::InvalidDateRange`](crate::error::EngineError::InvalidDateRange)
/// if a range starts after it ends.
pub fn working_dates(
    selection: &DateSelection,
    holidays: &HashSet<NaiveDate>,
    policy: &WorkingDayPolicy,
) -> EngineResult<Vec<NaiveDate>> {
    Ok(selection
        .dates()?
        .into_iter()
        .filter(|date| is_working_day(*date, holidays, policy))
        .collect())
}

/// Counts the leave days a selection consumes.
///
/// A selection made up entirely of non-working dates yields zero without error;
/// callers decide whether a zero-day request is acceptable.
///
/// # Errors
///
/// [`EngineError::InvalidDateRange`](crate::error::EngineError::InvalidDateRange)
/// if a range starts after it ends.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::count_working_days;
/// use leave_engine::models::{DateSelection, WorkingDayPolicy};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::HashSet;
///
/// // Saturday 2025-03-08 to Sunday 2025-03-09
/// let weekend = DateSelection::range(
///     NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
/// );
/// let days = count_working_days(&weekend, &HashSet::new(), &WorkingDayPolicy::default()).unwrap();
/// assert_eq!(days, Decimal::ONE);
/// ```
pub fn count_working_days(
    selection: &DateSelection,
    holidays: &HashSet<NaiveDate>,
    policy: &WorkingDayPolicy,
) -> EngineResult<Decimal> {
    let count = working_dates(selection, holidays, policy)?.len();
    Ok(Decimal::from(count))
}
