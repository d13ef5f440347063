//! Calendar-day helpers.
//!
//! Dates cross the crate boundary as ISO `yyyy-MM-dd` strings and are
//! normalized to [`NaiveDate`] (day precision, no time-of-day) before any
//! comparison. Parsing is fail-open: malformed input is logged and reported
//! as `None` rather than raised.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::warn;

/// ISO boundary format.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Display format used for derived schedule strings.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parses an ISO date, returning `None` for malformed input.
///
/// Accepts a trailing time component (`2024-01-01T08:00:00`) and discards it.
/// Anything else after the date makes the input malformed.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let day_part = match (trimmed.get(..10), trimmed.get(10..)) {
        (Some(day), Some(rest)) if rest.is_empty() || rest.starts_with('T') => day,
        (Some(_), Some(_)) => return None,
        _ => trimmed,
    };
    NaiveDate::parse_from_str(day_part, ISO_FORMAT).ok()
}

/// Parses an ISO date and logs a warning when it cannot be read.
///
/// `field` names the offending input in the log record.
pub fn parse_logged(s: &str, field: &str) -> Option<NaiveDate> {
    let parsed = parse_iso(s);
    if parsed.is_none() && !s.trim().is_empty() {
        warn!(field, value = s, "unparseable date ignored");
    }
    parsed
}

/// Formats a date as `yyyy-MM-dd`.
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Formats a date as `dd/MM/yyyy`.
pub fn to_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Adds (or subtracts) whole calendar days.
#[inline]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Signed calendar-day difference `later - earlier`.
#[inline]
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Saturday or Sunday.
#[inline]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether the ISO list contains `date`.
///
/// Entries are compared after normalization, so `2024-01-01` and
/// `2024-01-01T00:00:00` are the same day. Malformed entries never match.
pub fn list_contains(list: &[String], date: NaiveDate) -> bool {
    list.iter().any(|entry| parse_iso(entry) == Some(date))
}
