//! Data models for Marketpulse.
//!
//! Input records mirror the rows a marketplace backend hands over (listings
//! and login events). Every field is optional on the wire; the accessor
//! methods on [`ListingRecord`] apply the documented defaults so the
//! aggregators never have to.
//!
//! Output types form the [`AggregateResult`] tree. They carry no behaviour
//! and serialize with camelCase keys for direct consumption by a reporting UI.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::lenient;

/// Lifecycle status of a listing.
///
/// Anything other than `active` or `sold` (e.g. `draft`, `archived`) is
/// folded into [`ListingStatus::Other`] and counted as neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Sold,
    #[default]
    Other,
}

impl From<Option<String>> for ListingStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("active") => ListingStatus::Active,
            Some(s) if s.eq_ignore_ascii_case("sold") => ListingStatus::Sold,
            _ => ListingStatus::Other,
        }
    }
}

/// A single item listing as stored by the marketplace backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    /// Free-text category; empty or missing groups under "other".
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub category: Option<String>,

    /// Unit price. Missing, negative or non-finite values read as 0.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,

    /// Non-string values read as [`ListingStatus::Other`].
    #[serde(default, deserialize_with = "lenient::status")]
    pub status: ListingStatus,

    /// Units offered/sold. Missing or < 1 reads as 1.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub quantity: Option<i64>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub views_count: Option<i64>,

    #[serde(default, deserialize_with = "lenient::identifier")]
    pub seller_id: Option<String>,

    /// `None` when missing or unparseable; the record is then skipped by
    /// date-bucketed aggregations only.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub sold_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    /// Create a listing with the given identity, price and status.
    ///
    /// All other fields start at their defaults; use the `with_*` builders
    /// to fill them in.
    pub fn new(id: &str, title: &str, price: f64, status: ListingStatus) -> Self {
        Self {
            id: Some(id.to_string()),
            title: title.to_string(),
            price: Some(price),
            status,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_views(mut self, views: i64) -> Self {
        self.views_count = Some(views);
        self
    }

    pub fn with_seller(mut self, seller_id: &str) -> Self {
        self.seller_id = Some(seller_id.to_string());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_sold_at(mut self, sold_at: DateTime<Utc>) -> Self {
        self.sold_at = Some(sold_at);
        self
    }

    pub fn price(&self) -> f64 {
        self.price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(0.0)
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
            .filter(|q| *q >= 1)
            .map_or(1, |q| q as u64)
    }

    pub fn views(&self) -> u64 {
        self.views_count.filter(|v| *v >= 0).map_or(0, |v| v as u64)
    }

    pub fn is_sold(&self) -> bool {
        self.status == ListingStatus::Sold
    }

    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Gross sale value (`price × quantity`).
    pub fn revenue(&self) -> f64 {
        self.price() * self.quantity() as f64
    }

    /// `sold_at` if present, else `created_at`. Only meaningful for sold listings.
    pub fn effective_sale_date(&self) -> Option<DateTime<Utc>> {
        self.sold_at.or(self.created_at)
    }

    /// Time between creation and sale.
    ///
    /// `None` unless the listing is sold and `sold_at` is strictly after
    /// `created_at`; inverted or equal timestamps are treated as bad data.
    pub fn time_to_sale(&self) -> Option<Duration> {
        if !self.is_sold() {
            return None;
        }
        match (self.created_at, self.sold_at) {
            (Some(created), Some(sold)) if sold > created => Some(sold - created),
            _ => None,
        }
    }
}

/// One successful login by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginEvent {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl LoginEvent {
    pub fn new(user_id: &str, logged_in_at: DateTime<Utc>) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            logged_in_at: Some(logged_in_at),
        }
    }
}

/// The fixed input of one aggregation call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub listings: Vec<ListingRecord>,
    pub logins: Vec<LoginEvent>,
}

/// One of the four 6-hour windows of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityWindow {
    /// 00:00 to 05:59.
    Night,
    /// 06:00 to 11:59.
    Morning,
    /// 12:00 to 17:59.
    Afternoon,
    /// 18:00 to 23:59.
    Evening,
}

impl ActivityWindow {
    /// All windows in tie-break order.
    pub const ALL: [ActivityWindow; 4] = [
        ActivityWindow::Night,
        ActivityWindow::Morning,
        ActivityWindow::Afternoon,
        ActivityWindow::Evening,
    ];

    /// Window containing the given hour of day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => ActivityWindow::Night,
            6..=11 => ActivityWindow::Morning,
            12..=17 => ActivityWindow::Afternoon,
            _ => ActivityWindow::Evening,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ActivityWindow::Night => 0,
            ActivityWindow::Morning => 1,
            ActivityWindow::Afternoon => 2,
            ActivityWindow::Evening => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityWindow::Night => "Night",
            ActivityWindow::Morning => "Morning",
            ActivityWindow::Afternoon => "Afternoon",
            ActivityWindow::Evening => "Evening",
        }
    }

    pub fn sub_label(&self) -> &'static str {
        match self {
            ActivityWindow::Night => "12AM - 6AM",
            ActivityWindow::Morning => "6AM - 12PM",
            ActivityWindow::Afternoon => "12PM - 6PM",
            ActivityWindow::Evening => "6PM - 12AM",
        }
    }
}

// ============================================================================
// Aggregate output
// ============================================================================

/// Every metric derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Reference instant the report was computed against.
    pub generated_at: DateTime<Utc>,
    pub kpi: Kpi,
    /// January through December.
    pub monthly: [MonthlyEntry; 12],
    pub top_performing: Vec<TopListing>,
    pub health: MarketplaceHealth,
    pub category_breakdown: Vec<CategoryShare>,
    pub sales_by_category: Vec<CategorySales>,
    /// Monday through Sunday.
    pub weekly_activity: [WeekdayActivity; 7],
    pub activity_stats: ActivityStats,
}

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub revenue: f64,
    /// Units sold.
    pub sales: u64,
    pub active_listings: u64,
    pub total_views: u64,
    pub revenue_change: String,
    pub sales_change: String,
    pub views_change: String,
    /// Active listings created in the trailing 7 days.
    pub new_this_week: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyEntry {
    pub month: &'static str,
    pub revenue: f64,
    pub sales: u64,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopListing {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub sales: u64,
    pub views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceHealth {
    pub avg_sale_price: f64,
    /// Units sold per 100 views.
    pub conversion_rate: f64,
    pub active_sellers: u64,
    pub avg_time_to_sale_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub key: String,
    pub label: String,
    /// Share of all listings, as a rounded percentage.
    pub value: u32,
    pub listings: u64,
    pub sales: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub label: String,
    pub sales: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekdayActivity {
    pub day: &'static str,
    pub listings: u64,
    pub sales: u64,
    pub views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindowCount {
    pub window: ActivityWindow,
    pub label: &'static str,
    pub sub: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    /// `None` when no weekday has any views.
    pub peak_day: Option<&'static str>,
    pub peak_day_views: u64,
    pub most_active_time_label: &'static str,
    pub most_active_time_sub: &'static str,
    pub avg_daily_listings: f64,
    /// Night, morning, afternoon, evening.
    pub time_of_day: [TimeWindowCount; 4],
}
