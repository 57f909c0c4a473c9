//! Leave balance inputs and results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Caller-supplied balance figures for one employee and year.
///
/// `used_days` comes from the external request ledger and is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceInputs {
    /// The calendar year being queried.
    pub year: i32,
    /// Unused entitlement carried in from prior years.
    #[serde(default)]
    pub carry_forward_days: Decimal,
    /// Compensatory credit added verbatim.
    #[serde(default)]
    pub compensatory_days: Decimal,
    /// Approved and consumed working days for the year.
    #[serde(default)]
    pub used_days: Decimal,
}

/// The derived balance for one employee and year. Never persisted.
///
/// Invariants:
/// - `total_days = accrued_days + carry_forward_days + compensatory_days`
/// - `remaining_days = total_days - used_days`
/// - `is_overdrawn` iff `remaining_days < 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceResult {
    /// Entitlement accrued for the year.
    pub accrued_days: Decimal,
    /// Carry-forward credit.
    pub carry_forward_days: Decimal,
    /// Compensatory credit.
    pub compensatory_days: Decimal,
    /// Sum of all credits.
    pub total_days: Decimal,
    /// Days consumed.
    pub used_days: Decimal,
    /// Credits left after consumption; may be negative.
    pub remaining_days: Decimal,
    /// Informational overdraft flag.
    pub is_overdrawn: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_default_missing_amounts_to_zero() {
        let inputs: LeaveBalanceInputs = serde_json::from_str(r#"{"year": 2025}"#).unwrap();
        assert_eq!(inputs.year, 2025);
        assert_eq!(inputs.carry_forward_days, Decimal::ZERO);
        assert_eq!(inputs.compensatory_days, Decimal::ZERO);
        assert_eq!(inputs.used_days, Decimal::ZERO);
    }

    #[test]
    fn test_result_serializes_decimals_as_strings() {
        let result = LeaveBalanceResult {
            accrued_days: Decimal::new(95, 1),
            carry_forward_days: Decimal::new(3, 0),
            compensatory_days: Decimal::new(4, 0),
            total_days: Decimal::new(165, 1),
            used_days: Decimal::new(2, 0),
            remaining_days: Decimal::new(145, 1),
            is_overdrawn: false,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"total_days\":\"16.5\""));
        assert!(json.contains("\"is_overdrawn\":false"));
    }
}
