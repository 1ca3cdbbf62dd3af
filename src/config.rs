//! Runtime configuration.
//!
//! The engine itself only needs [`AnalyticsConfig`]; [`ServerConfig`] wraps it
//! with the HTTP settings the binary reads from the environment.

use std::env;

use chrono::{FixedOffset, Offset, Utc};
use tracing::warn;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Default size of the top-performing listings table.
pub const DEFAULT_TOP_LISTINGS: usize = 5;

/// Largest accepted UTC offset, in minutes (just under a day either way).
const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

/// Settings that shape the aggregate output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// How many sold listings the top-performing ranking keeps.
    pub top_listings: usize,

    /// Offset used for every calendar derivation (month, weekday, hour).
    pub utc_offset: FixedOffset,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_listings: DEFAULT_TOP_LISTINGS,
            utc_offset: utc(),
        }
    }
}

impl AnalyticsConfig {
    /// Config with a UTC offset given in minutes east of UTC.
    ///
    /// Out-of-range offsets fall back to UTC.
    pub fn with_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset = offset_from_minutes(minutes).unwrap_or_else(utc);
        self
    }

    /// Read `MARKETPULSE_TOP_LISTINGS` and `MARKETPULSE_UTC_OFFSET_MINUTES`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(top) = read_var::<usize>("MARKETPULSE_TOP_LISTINGS") {
            if top >= 1 {
                config.top_listings = top;
            } else {
                warn!(top, "MARKETPULSE_TOP_LISTINGS must be at least 1, using default");
            }
        }

        if let Some(minutes) = read_var::<i32>("MARKETPULSE_UTC_OFFSET_MINUTES") {
            match offset_from_minutes(minutes) {
                Some(offset) => config.utc_offset = offset,
                None => warn!(minutes, "UTC offset out of range, using UTC"),
            }
        }

        config
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
    pub analytics: AnalyticsConfig,
}

impl ServerConfig {
    /// Load configuration from environment.
    pub fn from_env() -> Self {
        Self {
            port: read_var("MARKETPULSE_PORT").unwrap_or(DEFAULT_PORT),
            analytics: AnalyticsConfig::from_env(),
        }
    }
}

fn read_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(var = name, value = %raw, "Ignoring malformed environment variable");
    }
    parsed
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();

        assert_eq!(config.top_listings, 5);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_with_offset_minutes() {
        let config = AnalyticsConfig::default().with_offset_minutes(-300);
        assert_eq!(config.utc_offset.local_minus_utc(), -300 * 60);

        let config = AnalyticsConfig::default().with_offset_minutes(330);
        assert_eq!(config.utc_offset.local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = AnalyticsConfig::default().with_offset_minutes(24 * 60);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }
}
