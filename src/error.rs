//! Error types for the leave engine.
//!
//! Only [`EngineError::HolidaySourceUnavailable`] and [`EngineError::InvalidDateRange`]
//! escape the calculation and holiday layers; the configuration variants are raised
//! while the engine is being assembled. Everything else (individual fetch attempts,
//! cache reads and writes, malformed feed events) degrades locally and is only logged.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the leave engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidDateRange {
///     start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid date range: start 2025-03-10 is after end 2025-03-07"
/// );
/// ```
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Every endpoint in the fetch ladder failed and no cached holidays exist.
    #[error("Holiday source unavailable: {url} ({attempts} attempts failed)")]
    HolidaySourceUnavailable {
        /// The feed URL that could not be fetched.
        url: String,
        /// How many endpoints were tried.
        attempts: usize,
    },

    /// A date range whose start falls after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// The first date of the range.
        start: NaiveDate,
        /// The last date of the range.
        end: NaiveDate,
    },

    /// Accrual parameters that break the `max >= base` invariant or are negative.
    #[error("Invalid accrual parameters: {message}")]
    InvalidAccrualParameters {
        /// A description of the violated constraint.
        message: String,
    },

    /// Balance amounts whose sum or difference cannot be represented.
    #[error("Invalid balance inputs: {message}")]
    InvalidBalanceInputs {
        /// Which figure could not be computed.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value parsed but could not be applied.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why it could not be applied.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
