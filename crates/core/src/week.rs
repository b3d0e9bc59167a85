//! Day/date reconciliation
//!
//! Converts between calendar dates and day-of-week indices and generates the
//! Monday-anchored 7-day window the schedule screens page through. All
//! weekday math runs on civil dates, never UTC instants; the blocking logic
//! downstream (cache, resolver, selection) depends on `date -> weekday`
//! being stable across the whole system.

use chrono::{Days, NaiveDate};
use palco_domain::{PalcoError, Result, WeekDay};

/// Day-of-week index of a calendar date, 0..6 with 0 = Sunday.
pub fn weekday_index_of(date: NaiveDate) -> u8 {
    palco_domain::weekday_index_of(date)
}

/// The 7-day window containing `anchor`, always Monday-first and
/// Sunday-last regardless of which weekday the anchor falls on.
pub fn week_window(anchor: NaiveDate) -> Vec<WeekDay> {
    let weekday = i64::from(weekday_index_of(anchor));
    // Sunday (index 0) belongs to the week that started six days earlier.
    let offset_to_monday = if weekday == 0 { -6 } else { 1 - weekday };

    let monday = add_days(anchor, offset_to_monday);
    (0..7).map(|day| WeekDay::for_date(add_days(monday, day))).collect()
}

/// `YYYY-MM-DD` rendering of a date.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` string.
///
/// # Errors
/// Returns `PalcoError::Validation` when the string is not a valid ISO date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| PalcoError::Validation(format!("invalid date '{value}': {err}")))
}

/// Long-form label, e.g. `Tuesday, April 29, 2025`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    // NaiveDate covers years far beyond any bookable calendar; a window
    // around a representable date is always representable.
    shifted.unwrap_or(date)
}
