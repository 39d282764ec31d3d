//! Clock and calendar arithmetic over `chrono` types.
//!
//! The engine works in fractional hours on top of `NaiveTime`/`NaiveDate`.
//! Weekdays are numbered with the week running Monday(1)..Sunday(7).

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Span between two clock times in fractional hours.
///
/// Returns a negative value when `end` precedes `start`; callers that require
/// a positive duration must validate.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_minutes() as f64 / 60.0
}

/// Add a fractional number of hours to a clock time.
///
/// Saturates within the day; the engine never schedules across midnight
/// because availability windows are same-day by construction.
pub fn add_hours(time: NaiveTime, hours: f64) -> NaiveTime {
    time + Duration::minutes((hours * 60.0).round() as i64)
}

/// ISO weekday number with the week running Monday(1)..Sunday(7).
pub fn weekday_number(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Whether the date falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
