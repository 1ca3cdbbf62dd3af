//! Marketpulse - marketplace analytics from raw listing and login snapshots.
//!
//! # Overview
//!
//! Marketpulse turns a snapshot of marketplace records (item listings, their
//! sale state and login events) into the metrics a reporting dashboard shows:
//! revenue and unit KPIs, monthly trends, top listings, marketplace health,
//! category breakdowns, weekday activity and time-of-day activity.
//!
//! The engine is pure. It performs no I/O, keeps no state between calls and
//! takes the reference instant as an explicit argument, so any number of
//! snapshots can be aggregated concurrently.
//!
//! # Modules
//!
//! - [`model`]: Input records and the aggregate output tree
//! - [`snapshot`]: Decoding untrusted JSON into a snapshot
//! - [`aggregation`]: The aggregators and the top-level builder
//! - [`config`]: Engine and server configuration
//! - [`error`]: Snapshot decoding errors
//! - [`api`]: HTTP API handlers

pub mod aggregation;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod snapshot;

pub use aggregation::{ReferenceFrame, build_aggregate};
pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use model::{AggregateResult, ListingRecord, ListingStatus, LoginEvent, Snapshot};
