//! Calculation logic for the leave engine.
//!
//! This module contains the pure, synchronous calculators: working-day
//! classification and counting over a date selection, annual accrual from hire
//! date and seniority, and the balance aggregation that combines them.

mod accrual;
mod balance;
mod working_days;

pub use accrual::{DAYS_PER_ACCRUAL_YEAR, compute_annual_accrual, round_days};
pub use balance::compute_balance;
pub use working_days::{count_working_days, is_working_day, working_dates};
