//! Business-hour arithmetic
//!
//! An hour counts when the hour boundary it ends on falls on Monday to
//! Friday (UTC). There is no holiday calendar and no time-of-day weighting.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Whole wall-clock hours in `elapsed`, truncated toward zero.
pub fn whole_hours(elapsed: Duration) -> i64 {
    elapsed.num_hours()
}

/// Count the business hours in `elapsed`, starting at `reference`.
///
/// Walks one hour at a time and checks the weekday of each hour boundary
/// after `reference`. A negative duration counts as zero.
pub fn business_hours(reference: DateTime<Utc>, elapsed: Duration) -> i64 {
    (1..=whole_hours(elapsed))
        .map(|hour| reference + Duration::hours(hour))
        .filter(|boundary| !matches!(boundary.weekday(), Weekday::Sat | Weekday::Sun))
        .fold(0, |count, _| count + 1)
}
