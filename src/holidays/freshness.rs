//! Freshness-bounded response cache.
//!
//! Each fetched feed URL owns two entries in the backing store: the raw JSON
//! payload under `holidays_cache_{url}` and the write time in epoch milliseconds
//! under `holidays_cache_{url}_ts`. An entry older than the window, or one that
//! cannot be read or parsed, is a miss.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::store::KeyValueStore;

/// Per-URL cache of feed payloads with a fixed freshness window.
#[derive(Clone)]
pub struct FreshnessCache {
    store: Arc<dyn KeyValueStore>,
    window: Duration,
}

impl FreshnessCache {
    /// Creates a cache over `store` whose entries stay fresh for `window`.
    pub fn new(store: Arc<dyn KeyValueStore>, window: Duration) -> Self {
        Self { store, window }
    }

    /// Returns the cached payload for `url` if it is still fresh.
    pub fn get(&self, url: &str) -> Option<Value> {
        self.get_at(url, Utc::now())
    }

    /// Returns the cached payload for `url` if it was fresh at `now`.
    pub fn get_at(&self, url: &str, now: DateTime<Utc>) -> Option<Value> {
        let payload_key = payload_key(url);
        let written_ms: i64 = self
            .store
            .get(&timestamp_key(&payload_key))
            .ok()
            .flatten()?
            .trim()
            .parse()
            .ok()?;

        let age_ms = now.timestamp_millis() - written_ms;
        let window_ms = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);
        if age_ms >= window_ms {
            tracing::debug!(url, age_ms, "Freshness cache entry expired");
            return None;
        }

        let payload = self.store.get(&payload_key).ok().flatten()?;
        serde_json::from_str(&payload).ok()
    }

    /// Stores `payload` for `url`, stamped with the current time.
    pub fn put(&self, url: &str, payload: &Value) {
        self.put_at(url, payload, Utc::now());
    }

    /// Stores `payload` for `url`, stamped with `now`. Failures are logged and ignored.
    pub fn put_at(&self, url: &str, payload: &Value, now: DateTime<Utc>) {
        let payload_key = payload_key(url);
        let written = self
            .store
            .set(&payload_key, &payload.to_string())
            .and_then(|_| {
                self.store
                    .set(&timestamp_key(&payload_key), &now.timestamp_millis().to_string())
            });
        if let Err(err) = written {
            tracing::debug!(url, error = %err, "Failed to write freshness cache entry");
        }
    }
}

fn payload_key(url: &str) -> String {
    format!("holidays_cache_{}", url)
}

fn timestamp_key(payload_key: &str) -> String {
    format!("{}_ts", payload_key)
}
