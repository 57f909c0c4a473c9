//! The loaded holiday calendar handle.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{HolidayIndex, HolidayNames, HolidayRecord, Language};

/// Both language editions of the holiday feed plus their derived lookups.
///
/// Built once per load and immutable afterwards; the loader replaces the whole
/// handle on refresh. Pass [`HolidayCalendar::holiday_set`] to the business-day
/// calculator.
///
/// # Example
///
/// ```
/// use leave_engine::holidays::HolidayCalendar;
/// use leave_engine::models::{HolidayRecord, Language};
/// use chrono::NaiveDate;
///
/// let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
/// let calendar = HolidayCalendar::new(
///     vec![HolidayRecord::new(christmas, "Christmas Day", None)],
///     vec![HolidayRecord::new(christmas, "聖誕節", None)],
/// );
///
/// assert!(calendar.contains(christmas));
/// assert_eq!(calendar.holiday_name(christmas, Language::Zh), Some("聖誕節"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    en: Edition,
    zh: Edition,
    dates: HashSet<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Edition {
    records: Vec<HolidayRecord>,
    index: HolidayIndex,
}

impl Edition {
    fn new(records: Vec<HolidayRecord>) -> Self {
        let index = HolidayIndex::build(&records);
        Self { records, index }
    }
}

impl HolidayCalendar {
    /// Builds a calendar from both editions' records, indexing each.
    pub fn new(en: Vec<HolidayRecord>, zh: Vec<HolidayRecord>) -> Self {
        Self::from_editions(Edition::new(en), Edition::new(zh))
    }

    /// Builds a calendar from records and previously built indices.
    pub fn from_parts(
        en: Vec<HolidayRecord>,
        en_index: HolidayIndex,
        zh: Vec<HolidayRecord>,
        zh_index: HolidayIndex,
    ) -> Self {
        Self::from_editions(
            Edition {
                records: en,
                index: en_index,
            },
            Edition {
                records: zh,
                index: zh_index,
            },
        )
    }

    fn from_editions(en: Edition, zh: Edition) -> Self {
        let dates = en
            .records
            .iter()
            .chain(zh.records.iter())
            .map(|record| record.date)
            .collect();
        Self { en, zh, dates }
    }

    fn edition(&self, language: Language) -> &Edition {
        match language {
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }

    /// Union of both editions' dates.
    pub fn holiday_set(&self) -> &HashSet<NaiveDate> {
        &self.dates
    }

    /// Returns true if either edition lists `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// The flat record list of one edition, in feed order.
    pub fn records(&self, language: Language) -> &[HolidayRecord] {
        &self.edition(language).records
    }

    /// The `year -> date -> name` index of one edition.
    pub fn index(&self, language: Language) -> &HolidayIndex {
        &self.edition(language).index
    }

    /// The holiday name for `date` in `language`.
    pub fn holiday_name(&self, date: NaiveDate, language: Language) -> Option<&str> {
        self.edition(language).index.name(date)
    }

    /// The holiday names for `date` in both languages.
    pub fn holiday_names(&self, date: NaiveDate) -> HolidayNames {
        HolidayNames {
            en: self.holiday_name(date, Language::En).map(str::to_string),
            zh: self.holiday_name(date, Language::Zh).map(str::to_string),
        }
    }

    /// One edition's holidays in `year`, sorted by date.
    pub fn holidays_in_year(&self, year: i32, language: Language) -> Vec<HolidayRecord> {
        let mut records: Vec<HolidayRecord> = self
            .records(language)
            .iter()
            .filter(|record| record.year == year)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.date);
        records
    }

    /// Returns true if neither edition holds any record.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
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

    fn divergent_calendar() -> HolidayCalendar {
        HolidayCalendar::new(
            vec![
                record("2025-12-26", "The first weekday after Christmas Day"),
                record("2025-12-25", "Christmas Day"),
                record("2026-01-01", "The first day of January"),
            ],
            vec![
                record("2025-12-25", "聖誕節"),
                record("2025-10-29", "重陽節"),
            ],
        )
    }

    #[test]
    fn test_holiday_set_is_union_of_editions() {
        let calendar = divergent_calendar();
        let set = calendar.holiday_set();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&make_date("2025-10-29")));
        assert!(set.contains(&make_date("2025-12-26")));
    }

    #[test]
    fn test_names_lookup_per_language() {
        let calendar = divergent_calendar();
        let christmas = make_date("2025-12-25");
        assert_eq!(calendar.holiday_name(christmas, Language::En), Some("Christmas Day"));
        assert_eq!(calendar.holiday_name(christmas, Language::Zh), Some("聖誕節"));

        let names = calendar.holiday_names(make_date("2025-10-29"));
        assert_eq!(names.en, None);
        assert_eq!(names.zh.as_deref(), Some("重陽節"));
    }

    #[test]
    fn test_holidays_in_year_sorted_and_filtered() {
        let calendar = divergent_calendar();
        let en_2025 = calendar.holidays_in_year(2025, Language::En);
        assert_eq!(en_2025.len(), 2);
        assert_eq!(en_2025[0].date, make_date("2025-12-25"));
        assert_eq!(en_2025[1].date, make_date("2025-12-26"));

        assert!(calendar.holidays_in_year(2024, Language::Zh).is_empty());
    }

    #[test]
    fn test_from_parts_keeps_given_index() {
        let en = vec![record("2025-05-01", "Labour Day")];
        let en_index = HolidayIndex::build(&en);
        let calendar = HolidayCalendar::from_parts(en, en_index.clone(), vec![], HolidayIndex::default());
        assert_eq!(calendar.index(Language::En), &en_index);
        assert!(calendar.records(Language::Zh).is_empty());
    }

    #[test]
    fn test_default_calendar_is_empty() {
        let calendar = HolidayCalendar::default();
        assert!(calendar.is_empty());
        assert!(!calendar.contains(make_date("2025-12-25")));
    }
}
