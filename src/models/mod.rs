//! Core data models for the leave engine.
//!
//! This module contains the holiday, policy, accrual and balance types shared by
//! the holiday loader, the calculators and the HTTP API.

mod accrual;
mod balance;
mod holiday;
mod policy;
mod selection;

pub use accrual::AccrualParameters;
pub use balance::{LeaveBalanceInputs, LeaveBalanceResult};
pub use holiday::{HolidayIndex, HolidayNames, HolidayRecord, Language};
pub use policy::WorkingDayPolicy;
pub use selection::DateSelection;
