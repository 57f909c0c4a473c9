//! Configuration loading and management for the leave engine.
//!
//! This module provides functionality to load the engine configuration from a
//! YAML file: holiday feed sources and relays, cache settings, the working-day
//! policy, and default accrual rates.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/leave_engine.yaml").unwrap();
//! println!("Freshness window: {}h", config.config().holidays.freshness_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AccrualDefaults, EngineConfig, FeedSources, HolidayFeedConfig};
