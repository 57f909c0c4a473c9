//! Working-day policy.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// States which weekdays are always non-working.
///
/// Any date in the holiday set is also non-working regardless of policy; that
/// rule is applied by the calculator, not configured here.
///
/// # Example
///
/// ```
/// use leave_engine::models::WorkingDayPolicy;
/// use chrono::Weekday;
///
/// let policy = WorkingDayPolicy::default();
/// assert!(policy.is_non_working_weekday(Weekday::Sun));
/// assert!(!policy.is_non_working_weekday(Weekday::Sat));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDayPolicy {
    /// Weekdays on which no leave is consumed.
    pub non_working_weekdays: Vec<Weekday>,
}

impl WorkingDayPolicy {
    /// Creates a policy with the given non-working weekdays.
    pub fn new(non_working_weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            non_working_weekdays: non_working_weekdays.into_iter().collect(),
        }
    }

    /// Returns true if the weekday is designated non-working.
    pub fn is_non_working_weekday(&self, weekday: Weekday) -> bool {
        self.non_working_weekdays.contains(&weekday)
    }
}

impl Default for WorkingDayPolicy {
    /// Sunday only; Saturdays are working days.
    fn default() -> Self {
        Self::new([Weekday::Sun])
    }
}
