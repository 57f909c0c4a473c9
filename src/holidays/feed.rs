//! Holiday feed parsing.
//!
//! The feed is a JSON rendering of an iCalendar document:
//!
//! ```json
//! {"vcalendar": [{"vevent": [
//!     {"dtstart": ["20250101", {"value": "DATE"}],
//!      "uid": "20250101@1823.gov.hk",
//!      "summary": "The first day of January"}
//! ]}]}
//! ```
//!
//! Only the first calendar is read. Events whose `dtstart` is missing or is not a
//! valid compact `YYYYMMDD` date are dropped; a document without the expected
//! structure yields no records.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::HolidayRecord;

/// Parses a compact `YYYYMMDD` date.
///
/// # Example
///
/// ```
/// use leave_engine::holidays::parse_compact_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_compact_date("20251225"), NaiveDate::from_ymd_opt(2025, 12, 25));
/// assert_eq!(parse_compact_date("2025-12-25"), None);
/// ```
pub fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}

/// Flattens a feed document into holiday records, in feed order.
pub fn parse_feed(document: &Value) -> Vec<HolidayRecord> {
    let calendar = match document.get("vcalendar") {
        Some(Value::Array(calendars)) => calendars.first(),
        Some(calendar @ Value::Object(_)) => Some(calendar),
        _ => None,
    };

    let Some(events) = calendar
        .and_then(|c| c.get("vevent"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("Holiday feed has no vcalendar/vevent structure");
        return Vec::new();
    };

    let records: Vec<HolidayRecord> = events.iter().filter_map(parse_event).collect();
    if records.len() < events.len() {
        tracing::debug!(
            dropped = events.len() - records.len(),
            kept = records.len(),
            "Dropped holiday events without a usable date"
        );
    }
    records
}

fn parse_event(event: &Value) -> Option<HolidayRecord> {
    let start = match event.get("dtstart")? {
        Value::Array(parts) => parts.first()?,
        other => other,
    };
    let date = parse_compact_date(start.as_str()?)?;
    let name = event
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let source_id = event.get("uid").and_then(Value::as_str).map(str::to_string);

    Some(HolidayRecord::new(date, name, source_id))
}
