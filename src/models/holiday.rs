//! Public holiday models.
//!
//! This module contains [`HolidayRecord`], the flat per-language record parsed
//! from a holiday feed, and [`HolidayIndex`], the derived `year -> date -> name`
//! lookup built once per load.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The language edition of a holiday feed.
///
/// The two editions are fetched independently and may disagree on coverage.
///
/// # Example
///
/// ```
/// use leave_engine::models::Language;
///
/// assert_eq!(Language::En.code(), "en");
/// assert_eq!("zh".parse::<Language>().unwrap(), Language::Zh);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English edition.
    En,
    /// Traditional Chinese edition.
    Zh,
}

impl Language {
    /// Every supported edition, in load order.
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    /// Returns the short code used in cache keys and query strings.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" | "tc" => Ok(Language::Zh),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// A single public holiday from one language edition of the feed.
///
/// # Example
///
/// ```
/// use leave_engine::models::HolidayRecord;
/// use chrono::NaiveDate;
///
/// let record = HolidayRecord::new(
///     NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
///     "Christmas Day",
///     Some("20251225@1823.gov.hk".to_string()),
/// );
/// assert_eq!(record.year, 2025);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The holiday name in the edition's language.
    pub name: String,
    /// The feed's identifier for the event, if it carried one.
    #[serde(default)]
    pub source_id: Option<String>,
    /// The calendar year of `date`.
    pub year: i32,
}

impl HolidayRecord {
    /// Creates a record, deriving `year` from `date`.
    pub fn new(date: NaiveDate, name: impl Into<String>, source_id: Option<String>) -> Self {
        Self {
            date,
            name: name.into(),
            source_id,
            year: date.year(),
        }
    }
}

/// Holiday names for one date across both editions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayNames {
    /// English name, if the English edition lists the date.
    pub en: Option<String>,
    /// Chinese name, if the Chinese edition lists the date.
    pub zh: Option<String>,
}

impl HolidayNames {
    /// Returns true if neither edition lists the date.
    pub fn is_empty(&self) -> bool {
        self.en.is_none() && self.zh.is_none()
    }
}

/// Read-only `year -> (date -> name)` lookup for one language edition.
///
/// Serializes as a nested JSON object so it can be written to the durable store
/// next to the flat record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayIndex {
    years: HashMap<i32, HashMap<NaiveDate, String>>,
}

impl HolidayIndex {
    /// Builds the index from a flat record list. A later record for the same
    /// date replaces an earlier one.
    pub fn build(records: &[HolidayRecord]) -> Self {
        let mut years: HashMap<i32, HashMap<NaiveDate, String>> = HashMap::new();
        for record in records {
            years
                .entry(record.date.year())
                .or_default()
                .insert(record.date, record.name.clone());
        }
        Self { years }
    }

    /// Looks up the holiday name for a date.
    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.years
            .get(&date.year())
            .and_then(|dates| dates.get(&date))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn record(date_str: &str, name: &str) -> HolidayRecord {
        HolidayRecord::new(make_date(date_str), name, None)
    }

    #[test]
    fn test_record_year_follows_date() {
        let r = record("2026-01-01", "The first day of January");
        assert_eq!(r.year, 2026);
    }

    #[test]
    fn test_language_parse_accepts_feed_code() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("tc".parse::<Language>().unwrap(), Language::Zh);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serialization() {
        assert_eq!(serde_json::to_string(&Language::Zh).unwrap(), "\"zh\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
    }

    #[test]
    fn test_index_lookup_by_year_and_date() {
        let index = HolidayIndex::build(&[
            record("2025-12-25", "Christmas Day"),
            record("2026-01-01", "The first day of January"),
        ]);

        assert_eq!(index.name(make_date("2025-12-25")), Some("Christmas Day"));
        assert_eq!(
            index.name(make_date("2026-01-01")),
            Some("The first day of January")
        );
        assert_eq!(index.name(make_date("2025-12-24")), None);
        assert_eq!(index.name(make_date("2026-12-25")), None);
    }

    #[test]
    fn test_index_later_record_replaces_earlier() {
        let index = HolidayIndex::build(&[
            record("2025-10-01", "National Day"),
            record("2025-10-01", "National Day (observed)"),
        ]);
        assert_eq!(
            index.name(make_date("2025-10-01")),
            Some("National Day (observed)")
        );
    }

    #[test]
    fn test_index_survives_json_round_trip() {
        let index = HolidayIndex::build(&[record("2025-05-01", "Labour Day")]);
        let json = serde_json::to_string(&index).unwrap();
        assert!(json.contains("\"2025\""));
        assert!(json.contains("\"2025-05-01\":\"Labour Day\""));

        let restored: HolidayIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_empty_index() {
        let index = HolidayIndex::build(&[]);
        assert_eq!(index, HolidayIndex::default());
        assert_eq!(index.name(make_date("2025-01-01")), None);
    }

    #[test]
    fn test_holiday_names_is_empty() {
        assert!(HolidayNames::default().is_empty());
        let names = HolidayNames {
            en: Some("Christmas Day".to_string()),
            zh: None,
        };
        assert!(!names.is_empty());
    }
}
