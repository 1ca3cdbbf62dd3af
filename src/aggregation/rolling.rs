//! Trailing-window listing counts.

use chrono::Duration;

use crate::aggregation::ReferenceFrame;
use crate::model::ListingRecord;

/// Span of the "new this week" count.
pub const WEEK_DAYS: i64 = 7;

/// Span and fixed divisor of the daily listing rate.
pub const MONTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingWindow {
    /// Active listings created in the last 7 days.
    pub new_this_week: u64,
    /// Listings created in the last 30 days, divided by 30.
    pub avg_daily_listings: f64,
}

pub fn compute(listings: &[ListingRecord], frame: &ReferenceFrame) -> RollingWindow {
    let week_start = frame.now() - Duration::days(WEEK_DAYS);
    let month_start = frame.now() - Duration::days(MONTH_DAYS);

    let new_this_week = listings
        .iter()
        .filter(|l| l.is_active())
        .filter(|l| l.created_at.is_some_and(|ts| ts >= week_start))
        .count() as u64;

    // Fixed 30-day divisor, regardless of how old the data is
    let last_month = listings
        .iter()
        .filter(|l| l.created_at.is_some_and(|ts| ts >= month_start))
        .count();

    RollingWindow {
        new_this_week,
        avg_daily_listings: last_month as f64 / MONTH_DAYS as f64,
    }
}
