//! Marketplace health indicators.

use std::collections::HashSet;

use crate::model::{ListingRecord, MarketplaceHealth};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Derive health indicators from the snapshot and its precomputed totals.
///
/// # Arguments
///
/// * `listings` - Every listing in the snapshot
/// * `revenue` - Revenue over all sold listings
/// * `units_sold` - Units over all sold listings
/// * `total_views` - Views over all listings
///
/// Every ratio is 0 when its denominator is 0.
pub fn compute(
    listings: &[ListingRecord],
    revenue: f64,
    units_sold: u64,
    total_views: u64,
) -> MarketplaceHealth {
    // Average price per unit sold
    let avg_sale_price = if units_sold > 0 {
        revenue / units_sold as f64
    } else {
        0.0
    };

    // Units sold per 100 views
    let conversion_rate = if total_views > 0 {
        100.0 * units_sold as f64 / total_views as f64
    } else {
        0.0
    };

    MarketplaceHealth {
        avg_sale_price,
        conversion_rate,
        active_sellers: active_sellers(listings),
        avg_time_to_sale_days: avg_time_to_sale_days(listings),
    }
}

/// Distinct sellers with at least one active listing.
fn active_sellers(listings: &[ListingRecord]) -> u64 {
    listings
        .iter()
        .filter(|l| l.is_active())
        .filter_map(|l| l.seller_id.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64
}

fn avg_time_to_sale_days(listings: &[ListingRecord]) -> f64 {
    let (total_days, count) = listings
        .iter()
        .filter_map(ListingRecord::time_to_sale)
        .fold((0.0, 0u64), |(total, count), elapsed| {
            (total + elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY, count + 1)
        });

    if count == 0 {
        0.0
    } else {
        total_days / count as f64
    }
}
