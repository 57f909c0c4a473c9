//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to the engine configuration.
///
/// # File Format
///
/// ```yaml
/// holidays:
///   sources:
///     en: https://www.1823.gov.hk/common/ical/en.json
///     zh: https://www.1823.gov.hk/common/ical/tc.json
///   relays:
///     - https://cors.isomorphic-git.org/{url}
///   freshness_hours: 12
///   request_timeout_secs: 10
///   retry_backoff_secs: 30
///   cache_dir: ./cache/holidays
/// working_days:
///   non_working_weekdays: [sun]
/// accrual:
///   base_days_per_year: "7.5"
///   seniority_increment_per_year: "1.0"
///   max_days_per_year: "16.5"
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/leave_engine.yaml")?;
/// println!("Relays: {}", loader.config().holidays.relays.len());
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - The accrual defaults break an accrual parameter rule (`InvalidAccrualParameters`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: EngineConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let loader = Self::from_config(config)?;
        tracing::info!(path = %path_str, "Loaded engine configuration");
        Ok(loader)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.accrual.validate()?;
        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
