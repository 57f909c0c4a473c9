//! Request types for the leave engine API.
//!
//! `POST /working-days` takes a [`DateSelection`](crate::models::DateSelection)
//! body directly; the accrual and balance endpoints use the types below.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AccrualDefaults;
use crate::error::EngineResult;
use crate::models::{AccrualParameters, LeaveBalanceInputs};

/// Per-request overrides of the configured accrual rates.
///
/// Any field left out falls back to the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualOverrides {
    /// Overrides `base_days_per_year`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_days_per_year: Option<Decimal>,
    /// Overrides `seniority_increment_per_year`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority_increment_per_year: Option<Decimal>,
    /// Overrides `max_days_per_year`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_per_year: Option<Decimal>,
}

impl AccrualOverrides {
    /// Merges the overrides over `defaults` and validates the result.
    pub fn parameters(
        &self,
        defaults: &AccrualDefaults,
        hire_date: NaiveDate,
    ) -> EngineResult<AccrualParameters> {
        AccrualParameters::new(
            self.base_days_per_year.unwrap_or(defaults.base_days_per_year),
            self.seniority_increment_per_year
                .unwrap_or(defaults.seniority_increment_per_year),
            self.max_days_per_year.unwrap_or(defaults.max_days_per_year),
            hire_date,
        )
    }
}

/// Request body for `POST /accrual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualRequest {
    /// The calendar year to accrue for.
    pub year: i32,
    /// The employee's hire date.
    pub hire_date: NaiveDate,
    /// Optional rate overrides.
    #[serde(default)]
    pub rates: AccrualOverrides,
}

/// Request body for `POST /balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// The employee's hire date.
    pub hire_date: NaiveDate,
    /// The calendar year being queried.
    pub year: i32,
    /// Unused entitlement carried in from prior years.
    #[serde(default)]
    pub carry_forward_days: Decimal,
    /// Compensatory credit.
    #[serde(default)]
    pub compensatory_days: Decimal,
    /// Working days already consumed this year.
    #[serde(default)]
    pub used_days: Decimal,
    /// Optional rate overrides.
    #[serde(default)]
    pub rates: AccrualOverrides,
}

impl BalanceRequest {
    /// The balance figures carried by the request.
    pub fn inputs(&self) -> LeaveBalanceInputs {
        LeaveBalanceInputs {
            year: self.year,
            carry_forward_days: self.carry_forward_days,
            compensatory_days: self.compensatory_days,
            used_days: self.used_days,
        }
    }
}

/// Query string of `GET /holidays`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayQuery {
    /// Year to list; the current year when absent.
    pub year: Option<i32>,
    /// `en` or `zh` (`tc` is accepted); English when absent.
    pub lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_accrual_request_without_rates() {
        let json = r#"{"year": 2025, "hire_date": "2022-11-01"}"#;
        let request: AccrualRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.year, 2025);
        assert_eq!(request.rates, AccrualOverrides::default());
    }

    #[test]
    fn test_deserialize_balance_request_defaults_amounts() {
        let json = r#"{"hire_date": "2020-01-01", "year": 2025, "used_days": "2"}"#;
        let request: BalanceRequest = serde_json::from_str(json).unwrap();
        let inputs = request.inputs();
        assert_eq!(inputs.carry_forward_days, Decimal::ZERO);
        assert_eq!(inputs.compensatory_days, Decimal::ZERO);
        assert_eq!(inputs.used_days, dec("2"));
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let overrides = AccrualOverrides {
            max_days_per_year: Some(dec("20")),
            ..AccrualOverrides::default()
        };
        let params = overrides
            .parameters(&AccrualDefaults::default(), make_date("2020-01-01"))
            .unwrap();
        assert_eq!(params.base_days_per_year, dec("7.5"));
        assert_eq!(params.seniority_increment_per_year, dec("1"));
        assert_eq!(params.max_days_per_year, dec("20"));
    }

    #[test]
    fn test_overrides_are_validated() {
        let overrides = AccrualOverrides {
            max_days_per_year: Some(dec("5")),
            ..AccrualOverrides::default()
        };
        let result = overrides.parameters(&AccrualDefaults::default(), make_date("2020-01-01"));
        assert!(matches!(
            result,
            Err(EngineError::InvalidAccrualParameters { .. })
        ));
    }
}
