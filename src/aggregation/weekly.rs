//! Day-of-week activity, Monday first.

use crate::aggregation::ReferenceFrame;
use crate::model::{ListingRecord, WeekdayActivity};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn empty_week() -> [WeekdayActivity; 7] {
    std::array::from_fn(|i| WeekdayActivity {
        day: WEEKDAY_LABELS[i],
        listings: 0,
        sales: 0,
        views: 0,
    })
}

/// Bucket listings and views by creation weekday and sold units by sale weekday.
pub fn aggregate(listings: &[ListingRecord], frame: &ReferenceFrame) -> [WeekdayActivity; 7] {
    listings.iter().fold(empty_week(), |mut week, listing| {
        if let Some(created) = listing.created_at {
            let day = &mut week[frame.weekday_index(created)];
            day.listings += 1;
            day.views = day.views.saturating_add(listing.views());
        }

        // Sales land on the sale weekday, falling back to creation
        if listing.is_sold() {
            if let Some(sold) = listing.effective_sale_date() {
                let day = &mut week[frame.weekday_index(sold)];
                day.sales = day.sales.saturating_add(listing.quantity());
            }
        }
        week
    })
}

/// The weekday with the most views; the earliest wins a tie.
///
/// `None` when no weekday has any views.
pub fn peak_day(week: &[WeekdayActivity; 7]) -> Option<&WeekdayActivity> {
    week.iter()
        .fold(None, |best: Option<&WeekdayActivity>, day| match best {
            Some(current) if current.views >= day.views => Some(current),
            _ if day.views > 0 => Some(day),
            _ => best,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingStatus;
    use chrono::{TimeZone, Utc};

    fn frame() -> ReferenceFrame {
        ReferenceFrame::utc(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_week_is_zero_filled() {
        let week = aggregate(&[], &frame());

        assert_eq!(week[0].day, "Mon");
        assert_eq!(week[6].day, "Sun");
        assert!(week.iter().all(|d| d.listings == 0 && d.sales == 0 && d.views == 0));
        assert!(peak_day(&week).is_none());
    }

    #[test]
    fn test_buckets_by_weekday() {
        // 2024-06-03 is a Monday, 2024-06-08 a Saturday
        let monday = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
        let saturday = Utc.with_ymd_and_hms(2024, 6, 8, 10, 0, 0).unwrap();
        let listings = vec![
            ListingRecord::new("1", "a", 10.0, ListingStatus::Active)
                .with_views(4)
                .with_created_at(monday),
            ListingRecord::new("2", "b", 10.0, ListingStatus::Sold)
                .with_views(6)
                .with_quantity(3)
                .with_created_at(monday)
                .with_sold_at(saturday),
        ];

        let week = aggregate(&listings, &frame());

        assert_eq!(week[0].listings, 2);
        assert_eq!(week[0].views, 10);
        assert_eq!(week[0].sales, 0);
        assert_eq!(week[5].sales, 3);
        assert_eq!(week[5].listings, 0);
    }

    #[test]
    fn test_peak_day_tie_goes_to_earliest() {
        let mut week = empty_week();
        week[2].views = 9;
        week[4].views = 9;
        week[1].views = 3;

        let peak = peak_day(&week).unwrap();

        assert_eq!(peak.day, "Wed");
        assert_eq!(peak.views, 9);
    }

    #[test]
    fn test_peak_day_sunday() {
        let mut week = empty_week();
        week[6].views = 1;

        assert_eq!(peak_day(&week).map(|d| d.day), Some("Sun"));
    }

    #[test]
    fn test_weekday_respects_offset() {
        // Sunday 23:30 UTC is Monday morning at UTC+2
        let late_sunday = Utc.with_ymd_and_hms(2024, 6, 9, 23, 30, 0).unwrap();
        let listings = vec![
            ListingRecord::new("1", "a", 10.0, ListingStatus::Active).with_created_at(late_sunday),
        ];
        let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let frame = ReferenceFrame::new(late_sunday, offset);

        let week = aggregate(&listings, &frame);

        assert_eq!(week[0].listings, 1);
        assert_eq!(week[6].listings, 0);
    }
}
