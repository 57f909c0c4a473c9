//! Application state for the leave engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::holidays::HolidayLoader;

/// Shared application state.
///
/// Holds the loaded configuration and the single holiday loader every request
/// shares, so the feed is fetched at most once per process.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    holidays: Arc<HolidayLoader>,
}

impl AppState {
    /// Creates a new application state from a configuration and a loader.
    pub fn new(config: ConfigLoader, holidays: HolidayLoader) -> Self {
        Self {
            config: Arc::new(config),
            holidays: Arc::new(holidays),
        }
    }

    /// Creates the state with a network-backed loader built from `config`.
    pub fn from_config(config: ConfigLoader) -> EngineResult<Self> {
        let holidays = HolidayLoader::from_config(&config.config().holidays)?;
        Ok(Self::new(config, holidays))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared holiday loader.
    pub fn holidays(&self) -> &HolidayLoader {
        &self.holidays
    }
}
