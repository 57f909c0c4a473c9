//! Response types for the leave engine API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{HolidayNames, HolidayRecord, Language};

/// Response body for `POST /working-days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDaysResponse {
    /// Number of working days in the selection.
    pub working_days: Decimal,
    /// The working dates themselves, ascending.
    pub dates: Vec<NaiveDate>,
}

/// Response body for `POST /accrual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResponse {
    /// The accrual year.
    pub year: i32,
    /// The hire date the accrual was computed from.
    pub hire_date: NaiveDate,
    /// Days accrued in `year`, rounded to two decimal places.
    pub accrued_days: Decimal,
}

/// Response body for `GET /holidays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayListResponse {
    /// The listed year.
    pub year: i32,
    /// The edition the names come from.
    pub language: Language,
    /// The year's holidays, sorted by date.
    pub holidays: Vec<HolidayRecord>,
}

/// Response body for `GET /holidays/{date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayLookupResponse {
    /// The looked-up date.
    pub date: NaiveDate,
    /// Whether either edition lists the date.
    pub is_holiday: bool,
    /// Names from each edition that lists the date.
    pub names: HolidayNames,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::HolidaySourceUnavailable { url, attempts } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "HOLIDAY_SOURCE_UNAVAILABLE",
                    "Holiday data is unavailable",
                    format!("{} could not be fetched after {} attempts", url, attempts),
                ),
            },
            err @ EngineError::InvalidDateRange { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_DATE_RANGE", err.to_string()),
            },
            err @ EngineError::InvalidAccrualParameters { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_ACCRUAL_PARAMETERS", err.to_string()),
            },
            err @ EngineError::InvalidBalanceInputs { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_BALANCE_INPUTS", err.to_string()),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { field, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Invalid configuration",
                    format!("{}: {}", field, message),
                ),
            },
        }
    }
}
