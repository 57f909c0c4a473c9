//! Date selections passed to the business-day calculator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A set of calendar dates to classify: either a contiguous inclusive range or
/// an explicit, possibly non-contiguous, list.
///
/// Deserializes from either `{"start": ..., "end": ...}` or `{"dates": [...]}`.
///
/// # Example
///
/// ```
/// use leave_engine::models::DateSelection;
/// use chrono::NaiveDate;
///
/// let range: DateSelection =
///     serde_json::from_str(r#"{"start": "2025-03-08", "end": "2025-03-09"}"#).unwrap();
/// assert_eq!(range.dates().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSelection {
    /// Every calendar date from `start` to `end`, inclusive.
    Range {
        /// First date.
        start: NaiveDate,
        /// Last date.
        end: NaiveDate,
    },
    /// Individually selected dates.
    Dates {
        /// The selected dates, in any order.
        dates: Vec<NaiveDate>,
    },
}

impl DateSelection {
    /// Creates a range selection.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        DateSelection::Range { start, end }
    }

    /// Creates an explicit selection.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        DateSelection::Dates {
            dates: dates.into_iter().collect(),
        }
    }

    /// Expands the selection into sorted, distinct dates.
    ///
    /// Fails with [`EngineError::InvalidDateRange`] when a range starts after it ends.
    pub fn dates(&self) -> EngineResult<Vec<NaiveDate>> {
        match self {
            DateSelection::Range { start, end } => {
                if start > end {
                    return Err(EngineError::InvalidDateRange {
                        start: *start,
                        end: *end,
                    });
                }
                Ok(start.iter_days().take_while(|d| d <= end).collect())
            }
            DateSelection::Dates { dates } => {
                let mut dates = dates.clone();
                dates.sort_unstable();
                dates.dedup();
                Ok(dates)
            }
        }
    }
}
