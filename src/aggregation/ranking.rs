//! Top-performing sold listings.

use crate::model::{ListingRecord, TopListing};

/// Rank sold listings by views, highest first, and keep the first `limit`.
///
/// The sort is stable, so listings with equal views keep their input order.
pub fn top_listings(listings: &[ListingRecord], limit: usize) -> Vec<TopListing> {
    let mut sold: Vec<&ListingRecord> = listings.iter().filter(|l| l.is_sold()).collect();
    sold.sort_by(|a, b| b.views().cmp(&a.views()));

    sold.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, listing)| TopListing {
            rank: i + 1,
            name: listing.title.clone(),
            sales: listing.quantity(),
            views: listing.views(),
        })
        .collect()
}
