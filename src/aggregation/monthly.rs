//! Monthly revenue, unit and view trends.
//!
//! Buckets are keyed by month of year only, so several years of data share
//! the same twelve slots.

use crate::aggregation::ReferenceFrame;
use crate::model::{ListingRecord, MonthlyEntry};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Accumulator for one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthBucket {
    pub revenue: f64,
    pub sales: u64,
    pub views: u64,
}

/// Twelve month buckets plus the sold listings that had no usable date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyTrend {
    pub buckets: [MonthBucket; 12],
    pub undated_revenue: f64,
    pub undated_sales: u64,
}

/// Bucket sold revenue/units by effective sale month and views by creation month.
pub fn aggregate(listings: &[ListingRecord], frame: &ReferenceFrame) -> MonthlyTrend {
    listings
        .iter()
        .fold(MonthlyTrend::default(), |mut trend, listing| {
            if listing.is_sold() {
                // Sold without any date still counts toward the totals
                match listing.effective_sale_date() {
                    Some(date) => {
                        let bucket = &mut trend.buckets[frame.month_index(date)];
                        bucket.revenue += listing.revenue();
                        bucket.sales = bucket.sales.saturating_add(listing.quantity());
                    }
                    None => {
                        trend.undated_revenue += listing.revenue();
                        trend.undated_sales =
                            trend.undated_sales.saturating_add(listing.quantity());
                    }
                }
            }

            // Views follow the creation month
            if let Some(created) = listing.created_at {
                let bucket = &mut trend.buckets[frame.month_index(created)];
                bucket.views = bucket.views.saturating_add(listing.views());
            }
            trend
        })
}

impl MonthlyTrend {
    /// Revenue over all sold listings, dated or not.
    pub fn total_revenue(&self) -> f64 {
        self.buckets.iter().map(|b| b.revenue).sum::<f64>() + self.undated_revenue
    }

    pub fn total_sales(&self) -> u64 {
        self.buckets
            .iter()
            .map(|b| b.sales)
            .fold(self.undated_sales, u64::saturating_add)
    }

    pub fn current(&self, frame: &ReferenceFrame) -> MonthBucket {
        self.buckets[frame.current_month_index()]
    }

    pub fn previous(&self, frame: &ReferenceFrame) -> MonthBucket {
        self.buckets[frame.previous_month_index()]
    }

    pub fn entries(&self) -> [MonthlyEntry; 12] {
        std::array::from_fn(|i| MonthlyEntry {
            month: MONTH_LABELS[i],
            revenue: self.buckets[i].revenue,
            sales: self.buckets[i].sales,
            views: self.buckets[i].views,
        })
    }
}

/// Month-over-month change in percent, rounded to one decimal.
///
/// Returns 0 when there is no positive previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }
    let pct = ((current - previous) / previous * 1000.0).round() / 10.0;
    // Tiny drops round to -0.0
    if pct == 0.0 { 0.0 } else { pct }
}

/// Render a change for display, e.g. `"12.5% from last month"`.
pub fn format_change(current: f64, previous: f64) -> String {
    if previous <= 0.0 {
        return "0% from last month".to_string();
    }
    format!("{:.1}% from last month", percent_change(current, previous))
}
