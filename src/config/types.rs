//! Configuration types for the leave engine.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from the YAML configuration file. Every section has defaults, so
//! an empty file yields the same engine as [`EngineConfig::default`].

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::EngineResult;
use crate::models::{AccrualParameters, Language, WorkingDayPolicy};

/// Feed URLs, one per language edition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSources {
    /// English edition.
    pub en: String,
    /// Chinese edition.
    pub zh: String,
}

impl FeedSources {
    /// Returns the feed URL for a language.
    pub fn url(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }
}

impl Default for FeedSources {
    fn default() -> Self {
        Self {
            en: "https://www.1823.gov.hk/common/ical/en.json".to_string(),
            zh: "https://www.1823.gov.hk/common/ical/tc.json".to_string(),
        }
    }
}

/// Holiday feed and cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HolidayFeedConfig {
    /// Direct feed URLs.
    pub sources: FeedSources,
    /// Relay URL templates tried in order after the direct fetch fails.
    ///
    /// `{url}` is replaced by the feed URL and `{url_encoded}` by its
    /// percent-encoded form.
    pub relays: Vec<String>,
    /// Freshness window of the per-URL response cache, in hours.
    pub freshness_hours: u64,
    /// Timeout applied to each fetch attempt, in seconds. `null` disables it.
    pub request_timeout_secs: Option<u64>,
    /// How long a failed load is remembered before the next request retries
    /// the network, in seconds.
    pub retry_backoff_secs: u64,
    /// Directory for the durable holiday store. In-memory when absent.
    pub cache_dir: Option<PathBuf>,
}

impl HolidayFeedConfig {
    /// The freshness window as a [`Duration`].
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_hours * 60 * 60)
    }

    /// The per-attempt timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

impl Default for HolidayFeedConfig {
    fn default() -> Self {
        Self {
            sources: FeedSources::default(),
            relays: vec![
                "https://cors.isomorphic-git.org/{url}".to_string(),
                "https://api.allorigins.win/raw?url={url_encoded}".to_string(),
                "https://r.jina.ai/{url}".to_string(),
            ],
            freshness_hours: 12,
            request_timeout_secs: Some(10),
            retry_backoff_secs: 30,
            cache_dir: None,
        }
    }
}

/// Default accrual rates applied when a request does not supply its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccrualDefaults {
    /// Days accrued for a full year with no seniority bonus.
    pub base_days_per_year: Decimal,
    /// Days added per completed year of seniority.
    pub seniority_increment_per_year: Decimal,
    /// Upper bound on a year's accrual.
    pub max_days_per_year: Decimal,
}

impl AccrualDefaults {
    /// Applies the accrual parameter rules to these defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAccrualParameters`] naming the first violated rule.
    pub fn validate(&self) -> EngineResult<()> {
        // No rule depends on the hire date
        self.parameters(NaiveDate::MIN).map(|_| ())
    }

    /// Builds validated accrual parameters for an employee hired on `hire_date`.
    pub fn parameters(&self, hire_date: NaiveDate) -> EngineResult<AccrualParameters> {
        AccrualParameters::new(
            self.base_days_per_year,
            self.seniority_increment_per_year,
            self.max_days_per_year,
            hire_date,
        )
    }
}

impl Default for AccrualDefaults {
    fn default() -> Self {
        Self {
            base_days_per_year: Decimal::new(75, 1),
            seniority_increment_per_year: Decimal::ONE,
            max_days_per_year: Decimal::new(165, 1),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Holiday feed and cache settings.
    pub holidays: HolidayFeedConfig,
    /// Which weekdays are never working days.
    pub working_days: WorkingDayPolicy,
    /// Default accrual rates.
    pub accrual: AccrualDefaults,
}
