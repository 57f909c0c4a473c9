//! Leave Entitlement & Business-Calendar Engine
//!
//! This crate loads public holidays from a bilingual feed, counts working days
//! over date ranges, accrues annual leave by seniority and aggregates a yearly
//! leave balance. An HTTP API over the same operations lives in [`api`].

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod holidays;
pub mod models;
