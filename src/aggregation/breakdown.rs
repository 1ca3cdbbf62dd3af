//! Per-category listing share and unit sales.

use std::collections::HashMap;

use crate::aggregation::category::{self, CategoryColor, CategoryKey};
use crate::model::{CategorySales, CategoryShare, ListingRecord};

/// Both category views, in first-seen category order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    pub shares: Vec<CategoryShare>,
    pub sales: Vec<CategorySales>,
}

#[derive(Debug, Clone)]
struct CategoryGroup {
    category: CategoryKey,
    listings: u64,
    sales: u64,
}

/// Group every listing by normalized category, whatever its status.
pub fn aggregate(listings: &[ListingRecord]) -> CategoryBreakdown {
    let (groups, _) = listings.iter().fold(
        (Vec::<CategoryGroup>::new(), HashMap::<String, usize>::new()),
        |(mut groups, mut index), listing| {
            let category = category::normalize(listing.category.as_deref());
            let slot = *index.entry(category.key.clone()).or_insert_with(|| {
                groups.push(CategoryGroup {
                    category,
                    listings: 0,
                    sales: 0,
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.listings += 1;
            if listing.is_sold() {
                group.sales = group.sales.saturating_add(listing.quantity());
            }
            (groups, index)
        },
    );

    // Shares are relative to every listing, not just the sold ones
    let total = listings.len() as u64;

    let shares = groups
        .iter()
        .map(|group| CategoryShare {
            key: group.category.key.clone(),
            label: group.category.label.clone(),
            value: share_percent(group.listings, total),
            listings: group.listings,
            sales: group.sales,
            color: CategoryColor::from_key(&group.category.key).hex(),
        })
        .collect();

    let sales = groups
        .into_iter()
        .map(|group| CategorySales {
            label: group.category.label,
            sales: group.sales,
        })
        .collect();

    CategoryBreakdown { shares, sales }
}

/// Rounded percentage of `part` in `total`; 0 when `total` is 0.
fn share_percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}
