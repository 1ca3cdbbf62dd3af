//! Aggregation logic turning a listing/login snapshot into report metrics.
//!
//! Every function in this module tree is a pure function of its inputs.
//! There is no shared state between calls, and time enters only through the
//! explicit [`ReferenceFrame`], so two calls with the same snapshot and the
//! same reference instant produce identical results.
//!
//! # Components
//!
//! - [`category`]: category key/label normalization and colour table
//! - [`monthly`]: 12 month buckets and month-over-month deltas
//! - [`ranking`]: top sold listings by views
//! - [`health`]: average price, conversion, sellers, time to sale
//! - [`breakdown`]: per-category share and sales
//! - [`weekly`]: 7 weekday buckets and the peak day
//! - [`activity`]: 6-hour activity windows
//! - [`rolling`]: trailing 7/30 day listing counts

pub mod activity;
pub mod breakdown;
pub mod category;
pub mod health;
pub mod monthly;
pub mod ranking;
pub mod rolling;
pub mod weekly;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::model::{ActivityStats, AggregateResult, Kpi, ListingRecord, LoginEvent, Snapshot};

/// The reference instant and the calendar it is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceFrame {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl ReferenceFrame {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Frame whose calendar is UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    /// Month of year, 0 = January.
    pub fn month_index(&self, ts: DateTime<Utc>) -> usize {
        self.local(ts).month0() as usize
    }

    /// Day of week, 0 = Monday.
    pub fn weekday_index(&self, ts: DateTime<Utc>) -> usize {
        self.local(ts).weekday().num_days_from_monday() as usize
    }

    pub fn hour(&self, ts: DateTime<Utc>) -> u32 {
        self.local(ts).hour()
    }

    pub fn current_month_index(&self) -> usize {
        self.month_index(self.now)
    }

    /// Month before the current one; January wraps to December.
    pub fn previous_month_index(&self) -> usize {
        (self.current_month_index() + 11) % 12
    }
}

/// Compute every report metric for one snapshot.
///
/// # Arguments
///
/// * `listings` - All listing records in the snapshot
/// * `logins` - Login events; may be empty
/// * `config` - Top-N size and calendar offset
/// * `now` - Reference timestamp for "this month" and trailing windows
///
/// # Returns
///
/// A structurally complete [`AggregateResult`]: empty input yields zeroed
/// buckets, never missing ones.
pub fn build_aggregate(
    listings: &[ListingRecord],
    logins: &[LoginEvent],
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> AggregateResult {
    let frame = ReferenceFrame::new(now, config.utc_offset);

    // Monthly buckets carry the revenue and unit totals
    let trend = monthly::aggregate(listings, &frame);
    let revenue = trend.total_revenue();
    let units_sold = trend.total_sales();
    let total_views = listings
        .iter()
        .map(ListingRecord::views)
        .fold(0, u64::saturating_add);
    let active_listings = listings.iter().filter(|l| l.is_active()).count() as u64;

    // Compare the current month against the one before it
    let current = trend.current(&frame);
    let previous = trend.previous(&frame);
    let rolling = rolling::compute(listings, &frame);

    let kpi = Kpi {
        revenue,
        sales: units_sold,
        active_listings,
        total_views,
        revenue_change: monthly::format_change(current.revenue, previous.revenue),
        sales_change: monthly::format_change(current.sales as f64, previous.sales as f64),
        views_change: monthly::format_change(current.views as f64, previous.views as f64),
        new_this_week: rolling.new_this_week,
    };

    // Distribution views
    let breakdown = breakdown::aggregate(listings);
    let weekly_activity = weekly::aggregate(listings, &frame);
    let peak = weekly::peak_day(&weekly_activity);
    let time_of_day = activity::classify(logins, listings, &frame);
    let busiest = activity::most_active(&time_of_day);

    let activity_stats = ActivityStats {
        peak_day: peak.map(|d| d.day),
        peak_day_views: peak.map_or(0, |d| d.views),
        most_active_time_label: busiest.label(),
        most_active_time_sub: busiest.sub_label(),
        avg_daily_listings: rolling.avg_daily_listings,
        time_of_day,
    };

    debug!(
        listings = listings.len(),
        logins = logins.len(),
        categories = breakdown.shares.len(),
        units_sold,
        "Aggregate built"
    );

    AggregateResult {
        generated_at: now,
        kpi,
        monthly: trend.entries(),
        top_performing: ranking::top_listings(listings, config.top_listings),
        health: health::compute(listings, revenue, units_sold, total_views),
        category_breakdown: breakdown.shares,
        sales_by_category: breakdown.sales,
        weekly_activity,
        activity_stats,
    }
}

impl Snapshot {
    /// Shorthand for [`build_aggregate`] over this snapshot.
    pub fn aggregate(&self, config: &AnalyticsConfig, now: DateTime<Utc>) -> AggregateResult {
        build_aggregate(&self.listings, &self.logins, config, now)
    }
}
