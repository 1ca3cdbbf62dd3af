//! Time-of-day activity windows.
//!
//! Login timestamps are the preferred signal. Snapshots without any login
//! events fall back to listing creation times.

use chrono::{DateTime, Utc};

use crate::aggregation::ReferenceFrame;
use crate::model::{ActivityWindow, ListingRecord, LoginEvent, TimeWindowCount};

/// Count timestamps per 6-hour window.
pub fn classify(
    logins: &[LoginEvent],
    listings: &[ListingRecord],
    frame: &ReferenceFrame,
) -> [TimeWindowCount; 4] {
    let empty = ActivityWindow::ALL.map(|window| TimeWindowCount {
        window,
        label: window.label(),
        sub: window.sub_label(),
        count: 0,
    });

    // Fall back to listing creation only when there are no logins at all
    if logins.is_empty() {
        tally(listings.iter().filter_map(|l| l.created_at), empty, frame)
    } else {
        tally(logins.iter().filter_map(|l| l.logged_in_at), empty, frame)
    }
}

fn tally(
    timestamps: impl Iterator<Item = DateTime<Utc>>,
    empty: [TimeWindowCount; 4],
    frame: &ReferenceFrame,
) -> [TimeWindowCount; 4] {
    timestamps.fold(empty, |mut windows, ts| {
        windows[ActivityWindow::from_hour(frame.hour(ts)).index()].count += 1;
        windows
    })
}

/// The busiest window; ties go to the earliest in night, morning, afternoon,
/// evening order.
pub fn most_active(windows: &[TimeWindowCount; 4]) -> ActivityWindow {
    windows
        .iter()
        .fold(&windows[0], |best, w| if w.count > best.count { w } else { best })
        .window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingStatus;
    use chrono::TimeZone;

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, hour, 15, 0).unwrap()
    }

    fn frame() -> ReferenceFrame {
        ReferenceFrame::utc(at_hour(12))
    }

    fn listing_at(hour: u32) -> ListingRecord {
        ListingRecord::new("l", "t", 1.0, ListingStatus::Active).with_created_at(at_hour(hour))
    }

    #[test]
    fn test_empty_input_reports_all_windows() {
        let windows = classify(&[], &[], &frame());

        assert_eq!(windows.len(), 4);
        assert!(windows.iter().all(|w| w.count == 0));
        assert_eq!(most_active(&windows), ActivityWindow::Night);
    }

    #[test]
    fn test_logins_take_precedence_over_listings() {
        let logins = vec![
            LoginEvent::new("u1", at_hour(8)),
            LoginEvent::new("u2", at_hour(9)),
        ];
        let listings = vec![listing_at(20), listing_at(21), listing_at(22)];

        let windows = classify(&logins, &listings, &frame());

        assert_eq!(windows[1].count, 2);
        assert_eq!(windows[3].count, 0);
        assert_eq!(most_active(&windows), ActivityWindow::Morning);
    }

    #[test]
    fn test_falls_back_to_listing_creation() {
        let listings = vec![listing_at(2), listing_at(14), listing_at(20)];

        let windows = classify(&[], &listings, &frame());

        assert_eq!(windows[0].count, 1);
        assert_eq!(windows[1].count, 0);
        assert_eq!(windows[2].count, 1);
        assert_eq!(windows[3].count, 1);
        assert_eq!(most_active(&windows), ActivityWindow::Night);
    }

    #[test]
    fn test_clear_mode() {
        let listings = vec![listing_at(19), listing_at(23), listing_at(13)];

        let windows = classify(&[], &listings, &frame());

        assert_eq!(most_active(&windows), ActivityWindow::Evening);
        assert_eq!(windows[3].label, "Evening");
        assert_eq!(windows[3].sub, "6PM - 12AM");
    }

    #[test]
    fn test_hour_uses_frame_offset() {
        // 22:15 UTC is 03:15 at UTC+5
        let logins = vec![LoginEvent::new("u1", at_hour(22))];
        let offset = chrono::FixedOffset::east_opt(5 * 3600).unwrap();
        let frame = ReferenceFrame::new(at_hour(12), offset);

        let windows = classify(&logins, &[], &frame);

        assert_eq!(windows[0].count, 1);
        assert_eq!(windows[3].count, 0);
    }
}
