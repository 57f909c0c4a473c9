//! Holiday calendar loading.
//!
//! This module fetches the bilingual public-holiday feed, caches it in two
//! layers and exposes the resulting [`HolidayCalendar`] to the business-day
//! calculator:
//!
//! - [`feed`]: feed document parsing
//! - [`transport`]: the HTTP client seam and relay ladder
//! - [`freshness`]: the time-bounded per-URL response cache
//! - [`store`]: key-value stores backing both caches
//! - [`calendar`]: the loaded, immutable calendar handle
//! - [`loader`]: [`HolidayLoader`], which ties the layers together

pub mod calendar;
pub mod feed;
pub mod freshness;
pub mod loader;
pub mod store;
pub mod transport;

pub use calendar::HolidayCalendar;
pub use feed::{parse_compact_date, parse_feed};
pub use freshness::FreshnessCache;
pub use loader::{HolidayLoader, index_key, list_key};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use transport::{EndpointStrategy, FeedClient, FetchError, ReqwestFeedClient};
