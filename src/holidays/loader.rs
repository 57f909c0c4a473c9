//! Holiday calendar loading.
//!
//! Lookups go through three layers, checked in order:
//!
//! 1. the in-memory [`HolidayCalendar`] installed by a previous load;
//! 2. the durable store, which keeps both editions' record lists and indices
//!    with no expiry;
//! 3. the network, where each feed URL is first looked up in the
//!    [`FreshnessCache`] and otherwise fetched through the endpoint ladder.
//!
//! Only [`HolidayLoader::ensure_loaded`] and [`HolidayLoader::refresh`] can fail;
//! every synchronous lookup degrades to "no holiday". A failed initial load is
//! remembered for the configured retry backoff, during which `ensure_loaded`
//! returns the same error without touching the network.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::{FeedSources, HolidayFeedConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{HolidayIndex, HolidayNames, HolidayRecord, Language};

use super::calendar::HolidayCalendar;
use super::feed::parse_feed;
use super::freshness::FreshnessCache;
use super::store::{FileStore, KeyValueStore, MemoryStore};
use super::transport::{EndpointStrategy, FeedClient, FetchError, ReqwestFeedClient};

/// Durable-store key of one edition's record list.
pub fn list_key(language: Language) -> String {
    format!("holidays_list_{}", language.code())
}

/// Durable-store key of one edition's year index.
pub fn index_key(language: Language) -> String {
    format!("holidays_yearmap_{}", language.code())
}

/// Loads, caches and serves the bilingual public-holiday calendar.
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::HolidayFeedConfig;
/// use leave_engine::holidays::HolidayLoader;
///
/// # async fn run() -> leave_engine::error::EngineResult<()> {
/// let loader = HolidayLoader::from_config(&HolidayFeedConfig::default())?;
/// let calendar = loader.ensure_loaded().await?;
/// println!("{} holiday dates", calendar.holiday_set().len());
/// # Ok(())
/// # }
/// ```
pub struct HolidayLoader {
    client: Arc<dyn FeedClient>,
    sources: FeedSources,
    strategies: Vec<EndpointStrategy>,
    freshness: FreshnessCache,
    durable: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Arc<HolidayCalendar>>>,
    last_failure: RwLock<Option<(Instant, EngineError)>>,
    retry_backoff: Duration,
    load_lock: Mutex<()>,
}

/// How far a network load may lean on the cache layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// Fresh responses are reused and a failed edition may fall back to its
    /// durable list.
    Initial,
    /// Every cache layer is bypassed.
    Refresh,
}

impl HolidayLoader {
    /// Creates a loader over explicit collaborators.
    ///
    /// `session` backs the freshness cache; `durable` holds the record lists and
    /// indices across restarts.
    pub fn new(
        client: Arc<dyn FeedClient>,
        config: &HolidayFeedConfig,
        session: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client,
            sources: config.sources.clone(),
            strategies: EndpointStrategy::ladder(config.relays.as_slice()),
            freshness: FreshnessCache::new(session, config.freshness_window()),
            durable,
            current: RwLock::new(None),
            last_failure: RwLock::new(None),
            retry_backoff: config.retry_backoff(),
            load_lock: Mutex::new(()),
        }
    }

    /// Creates a loader with an HTTP client and stores built from `config`.
    ///
    /// An unusable `cache_dir` falls back to an in-memory durable store.
    pub fn from_config(config: &HolidayFeedConfig) -> EngineResult<Self> {
        let client = ReqwestFeedClient::new(config.request_timeout()).map_err(|e| {
            EngineError::InvalidConfig {
                field: "holidays.request_timeout_secs".to_string(),
                message: e.to_string(),
            }
        })?;

        let durable: Arc<dyn KeyValueStore> = match &config.cache_dir {
            Some(dir) => match FileStore::open(dir) {
                Ok(store) => {
                    tracing::info!(dir = %store.dir().display(), "Using durable holiday cache");
                    Arc::new(store)
                }
                Err(err) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %err,
                        "Holiday cache directory unusable, falling back to memory"
                    );
                    Arc::new(MemoryStore::new())
                }
            },
            None => Arc::new(MemoryStore::new()),
        };

        Ok(Self::new(
            Arc::new(client),
            config,
            Arc::new(MemoryStore::new()),
            durable,
        ))
    }

    /// Fetches and parses one edition of the feed.
    ///
    /// # Errors
    ///
    /// [`EngineError::HolidaySourceUnavailable`] when every endpoint fails.
    pub async fn fetch_holidays(&self, language: Language) -> EngineResult<Vec<HolidayRecord>> {
        self.fetch_edition(language, LoadMode::Initial).await
    }

    async fn fetch_edition(
        &self,
        language: Language,
        mode: LoadMode,
    ) -> EngineResult<Vec<HolidayRecord>> {
        let url = self.sources.url(language);
        let document = self.fetch_json(url, mode).await?;
        let records = parse_feed(&document);
        tracing::debug!(language = %language, records = records.len(), "Parsed holiday feed");
        Ok(records)
    }

    /// Makes both editions available, loading them at most once.
    ///
    /// Returns the installed calendar immediately when one exists, then tries
    /// the durable store, then fetches both editions concurrently. When a fetch
    /// fails, that edition falls back to whatever durable list exists.
    ///
    /// # Errors
    ///
    /// [`EngineError::HolidaySourceUnavailable`] when an edition can be neither
    /// fetched nor read from any cache. Within the retry backoff of such a
    /// failure the same error is returned without another fetch.
    pub async fn ensure_loaded(&self) -> EngineResult<Arc<HolidayCalendar>> {
        if let Some(calendar) = self.current() {
            return Ok(calendar);
        }

        let _guard = self.load_lock.lock().await;
        if let Some(calendar) = self.current() {
            return Ok(calendar);
        }

        if let Some(calendar) = self.read_durable_calendar() {
            tracing::info!(
                dates = calendar.holiday_set().len(),
                "Loaded holidays from durable cache"
            );
            return Ok(self.install(calendar));
        }

        if let Some(err) = self.recent_failure() {
            tracing::debug!(error = %err, "Holiday load failed recently, not retrying yet");
            return Err(err);
        }

        match self.fetch_calendar(LoadMode::Initial).await {
            Ok(calendar) => Ok(self.install(calendar)),
            Err(err) => {
                *self.last_failure.write().unwrap_or_else(PoisonError::into_inner) =
                    Some((Instant::now(), err.clone()));
                Err(err)
            }
        }
    }

    /// Refetches both editions from the network.
    ///
    /// The freshness cache, the durable store, the installed calendar and any
    /// remembered failure are all ignored. On success the indices are rebuilt,
    /// the durable entries rewritten and the new calendar installed. On failure
    /// the current calendar is kept.
    pub async fn refresh(&self) -> EngineResult<Arc<HolidayCalendar>> {
        let _guard = self.load_lock.lock().await;
        let calendar = self.fetch_calendar(LoadMode::Refresh).await?;
        Ok(self.install(calendar))
    }

    /// The installed calendar, if any load has completed.
    pub fn current(&self) -> Option<Arc<HolidayCalendar>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Union of both editions' dates; empty before the first load.
    pub fn holiday_set(&self) -> HashSet<NaiveDate> {
        self.current()
            .map(|calendar| calendar.holiday_set().clone())
            .unwrap_or_default()
    }

    /// The holiday name for `date` in `language`.
    ///
    /// Reads the durable index directly when nothing is installed yet.
    pub fn holiday_name(&self, date: NaiveDate, language: Language) -> Option<String> {
        if let Some(calendar) = self.current() {
            return calendar.holiday_name(date, language).map(str::to_string);
        }
        self.read_durable::<HolidayIndex>(&index_key(language))
            .and_then(|index| index.name(date).map(str::to_string))
    }

    /// The holiday names for `date` in both languages.
    pub fn holiday_names(&self, date: NaiveDate) -> HolidayNames {
        HolidayNames {
            en: self.holiday_name(date, Language::En),
            zh: self.holiday_name(date, Language::Zh),
        }
    }

    /// One edition's holidays in `year`, sorted; empty before the first load.
    pub fn holidays_in_year(&self, year: i32, language: Language) -> Vec<HolidayRecord> {
        self.current()
            .map(|calendar| calendar.holidays_in_year(year, language))
            .unwrap_or_default()
    }

    fn install(&self, calendar: HolidayCalendar) -> Arc<HolidayCalendar> {
        let calendar = Arc::new(calendar);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(calendar.clone());
        *self.last_failure.write().unwrap_or_else(PoisonError::into_inner) = None;
        calendar
    }

    fn recent_failure(&self) -> Option<EngineError> {
        let last_failure = self.last_failure.read().unwrap_or_else(PoisonError::into_inner);
        last_failure
            .as_ref()
            .filter(|(failed_at, _)| failed_at.elapsed() < self.retry_backoff)
            .map(|(_, err)| err.clone())
    }

    async fn fetch_calendar(&self, mode: LoadMode) -> EngineResult<HolidayCalendar> {
        let (en, zh) = tokio::join!(
            self.fetch_edition(Language::En, mode),
            self.fetch_edition(Language::Zh, mode)
        );

        let en = self.resolve_edition(Language::En, en, mode)?;
        let zh = self.resolve_edition(Language::Zh, zh, mode)?;

        let calendar = HolidayCalendar::new(en, zh);
        if calendar.is_empty() {
            tracing::warn!("Both holiday feeds parsed to no records");
        }
        self.write_durable_calendar(&calendar);
        tracing::info!(
            en = calendar.records(Language::En).len(),
            zh = calendar.records(Language::Zh).len(),
            dates = calendar.holiday_set().len(),
            "Loaded holidays from feed"
        );
        Ok(calendar)
    }

    fn resolve_edition(
        &self,
        language: Language,
        fetched: EngineResult<Vec<HolidayRecord>>,
        mode: LoadMode,
    ) -> EngineResult<Vec<HolidayRecord>> {
        match fetched {
            Ok(records) => Ok(records),
            Err(err) if mode == LoadMode::Initial => {
                match self.read_durable::<Vec<HolidayRecord>>(&list_key(language)) {
                    Some(records) => {
                        tracing::warn!(
                            language = %language,
                            error = %err,
                            "Holiday feed unavailable, using durable cache"
                        );
                        Ok(records)
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_json(&self, url: &str, mode: LoadMode) -> EngineResult<Value> {
        if mode == LoadMode::Initial {
            if let Some(document) = self.freshness.get(url) {
                tracing::debug!(url, "Holiday feed served from freshness cache");
                return Ok(document);
            }
        }

        for (attempt, strategy) in self.strategies.iter().enumerate() {
            let endpoint = strategy.endpoint(url);
            match self.fetch_endpoint(&endpoint).await {
                Ok(document) => {
                    tracing::info!(
                        url,
                        strategy = strategy.label(),
                        attempt = attempt + 1,
                        "Fetched holiday feed"
                    );
                    self.freshness.put(url, &document);
                    return Ok(document);
                }
                Err(err) => {
                    tracing::warn!(
                        url,
                        endpoint = %endpoint,
                        strategy = strategy.label(),
                        error = %err,
                        "Holiday feed attempt failed"
                    );
                }
            }
        }

        Err(EngineError::HolidaySourceUnavailable {
            url: url.to_string(),
            attempts: self.strategies.len(),
        })
    }

    async fn fetch_endpoint(&self, endpoint: &str) -> Result<Value, FetchError> {
        let body = self.client.get_text(endpoint).await?;
        // Some relays prepend a byte-order mark that serde_json rejects
        let body = body.strip_prefix('\u{feff}').unwrap_or(&body);
        Ok(serde_json::from_str(body)?)
    }

    /// Both record lists are required; a missing or corrupted index is rebuilt.
    fn read_durable_calendar(&self) -> Option<HolidayCalendar> {
        let en = self.read_durable::<Vec<HolidayRecord>>(&list_key(Language::En))?;
        let zh = self.read_durable::<Vec<HolidayRecord>>(&list_key(Language::Zh))?;
        let en_index = self
            .read_durable::<HolidayIndex>(&index_key(Language::En))
            .unwrap_or_else(|| HolidayIndex::build(&en));
        let zh_index = self
            .read_durable::<HolidayIndex>(&index_key(Language::Zh))
            .unwrap_or_else(|| HolidayIndex::build(&zh));
        Some(HolidayCalendar::from_parts(en, en_index, zh, zh_index))
    }

    fn write_durable_calendar(&self, calendar: &HolidayCalendar) {
        for language in Language::ALL {
            self.write_durable(&list_key(language), calendar.records(language));
            self.write_durable(&index_key(language), calendar.index(language));
        }
    }

    fn read_durable<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.durable.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::debug!(key, error = %err, "Durable cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(key, error = %err, "Ignoring corrupted durable cache entry");
                None
            }
        }
    }

    fn write_durable<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let written = serde_json::to_string(value)
            .map_err(|e| e.to_string())
            .and_then(|raw| self.durable.set(key, &raw).map_err(|e| e.to_string()));
        if let Err(err) = written {
            tracing::debug!(key, error = %err, "Durable cache write failed");
        }
    }
}
