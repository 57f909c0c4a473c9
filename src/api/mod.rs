//! HTTP API module for the leave engine.
//!
//! This module provides the REST endpoints for counting working days,
//! computing accrual and balances, and looking up public holidays.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AccrualOverrides, AccrualRequest, BalanceRequest, HolidayQuery};
pub use response::{
    AccrualResponse, ApiError, ApiErrorResponse, HolidayListResponse, HolidayLookupResponse,
    WorkingDaysResponse,
};
pub use state::AppState;
