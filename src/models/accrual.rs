//! Per-employee accrual parameters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Inputs to the annual-leave accrual formula for one employee.
///
/// Invariant: `max_days_per_year >= base_days_per_year`, no rate is negative, and
/// `base_days_per_year` can be pro-rated without overflowing.
/// [`AccrualParameters::new`] enforces it; values deserialized from a request
/// should be checked with [`AccrualParameters::validate`].
///
/// # Example
///
/// ```
/// use leave_engine::models::AccrualParameters;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let params = AccrualParameters::new(
///     Decimal::new(75, 1),
///     Decimal::ONE,
///     Decimal::new(165, 1),
///     NaiveDate::from_ymd_opt(2022, 11, 1).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(params.max_days_per_year, Decimal::new(165, 1));
///
/// assert!(AccrualParameters::new(
///     Decimal::new(75, 1),
///     Decimal::ONE,
///     Decimal::new(5, 0),
///     NaiveDate::from_ymd_opt(2022, 11, 1).unwrap(),
/// )
/// .is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualParameters {
    /// Days accrued for a full year with no seniority bonus.
    pub base_days_per_year: Decimal,
    /// Days added per completed year of seniority.
    pub seniority_increment_per_year: Decimal,
    /// Upper bound on a year's accrual.
    pub max_days_per_year: Decimal,
    /// The employee's first day of employment.
    pub hire_date: NaiveDate,
}

impl AccrualParameters {
    /// Creates validated accrual parameters.
    pub fn new(
        base_days_per_year: Decimal,
        seniority_increment_per_year: Decimal,
        max_days_per_year: Decimal,
        hire_date: NaiveDate,
    ) -> EngineResult<Self> {
        let params = Self {
            base_days_per_year,
            seniority_increment_per_year,
            max_days_per_year,
            hire_date,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the parameter invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.base_days_per_year < Decimal::ZERO {
            return Err(EngineError::InvalidAccrualParameters {
                message: format!(
                    "base_days_per_year {} must not be negative",
                    self.base_days_per_year
                ),
            });
        }
        // The hire-year branch pro-rates base by up to 366 days
        if self.base_days_per_year.checked_mul(Decimal::from(366)).is_none() {
            return Err(EngineError::InvalidAccrualParameters {
                message: format!(
                    "base_days_per_year {} is too large to pro-rate",
                    self.base_days_per_year
                ),
            });
        }
        if self.seniority_increment_per_year < Decimal::ZERO {
            return Err(EngineError::InvalidAccrualParameters {
                message: format!(
                    "seniority_increment_per_year {} must not be negative",
                    self.seniority_increment_per_year
                ),
            });
        }
        if self.max_days_per_year < self.base_days_per_year {
            return Err(EngineError::InvalidAccrualParameters {
                message: format!(
                    "max_days_per_year {} is below base_days_per_year {}",
                    self.max_days_per_year, self.base_days_per_year
                ),
            });
        }
        Ok(())
    }
}
