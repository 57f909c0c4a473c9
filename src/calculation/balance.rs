//! Leave balance aggregation.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AccrualParameters, LeaveBalanceInputs, LeaveBalanceResult};

use super::accrual::{compute_annual_accrual, round_days};

/// Folds accrual, carry-forward, compensatory credit and usage into a balance.
///
/// `used_days` is trusted as supplied. A negative remainder is reported through
/// `is_overdrawn` and never clamped.
///
/// # Errors
///
/// [`EngineError::InvalidBalanceInputs`] if the amounts are too large to add up.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::compute_balance;
/// use leave_engine::models::{AccrualParameters, LeaveBalanceInputs};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let params = AccrualParameters::new(
///     dec("7.5"),
///     dec("1.0"),
///     dec("16.5"),
///     NaiveDate::from_ymd_opt(2022, 11, 1).unwrap(),
/// )
/// .unwrap();
/// let inputs = LeaveBalanceInputs {
///     year: 2025,
///     carry_forward_days: dec("3"),
///     compensatory_days: dec("4"),
///     used_days: dec("2"),
/// };
///
/// let balance = compute_balance(&params, &inputs).unwrap();
/// assert_eq!(balance.total_days, dec("16.5"));
/// assert_eq!(balance.remaining_days, dec("14.5"));
/// assert!(!balance.is_overdrawn);
/// ```
pub fn compute_balance(
    params: &AccrualParameters,
    inputs: &LeaveBalanceInputs,
) -> EngineResult<LeaveBalanceResult> {
    let accrued_days = compute_annual_accrual(inputs.year, params);
    let total_days = accrued_days
        .checked_add(inputs.carry_forward_days)
        .and_then(|days| days.checked_add(inputs.compensatory_days))
        .map(round_days)
        .ok_or_else(|| EngineError::InvalidBalanceInputs {
            message: "total_days exceeds the representable range".to_string(),
        })?;
    let remaining_days = total_days.checked_sub(inputs.used_days).ok_or_else(|| {
        EngineError::InvalidBalanceInputs {
            message: "remaining_days exceeds the representable range".to_string(),
        }
    })?;

    tracing::debug!(
        year = inputs.year,
        accrued_days = %accrued_days,
        total_days = %total_days,
        remaining_days = %remaining_days,
        "Computed leave balance"
    );

    Ok(LeaveBalanceResult {
        accrued_days,
        carry_forward_days: inputs.carry_forward_days,
        compensatory_days: inputs.compensatory_days,
        total_days,
        used_days: inputs.used_days,
        remaining_days,
        is_overdrawn: remaining_days < Decimal::ZERO,
    })
}
