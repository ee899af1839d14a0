use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Canonical calendar-day key format used for grouping and comparison.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Timestamps carrying an explicit offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Wall-clock timestamps, already expressed in local time.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    DATE_KEY_FORMAT,
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
];

/// Parse any supported date representation into the calendar day it falls on in `tz`.
///
/// Instants with an offset are converted into `tz` before the date is taken, so
/// `2025-06-01T23:00:00-07:00` lands on June 2nd for a UTC reader and on June 1st
/// for a reader at UTC-7. Date-only and offset-less values are wall-clock values
/// and keep their calendar day as written.
pub fn parse_day<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(tz).date_naive());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(raw, format) {
            return Some(instant.with_timezone(tz).date_naive());
        }
    }

    if let Ok(instant) = DateTime::parse_from_rfc2822(raw) {
        return Some(instant.with_timezone(tz).date_naive());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(local.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Format a calendar day as its canonical key.
pub fn day_key(day: NaiveDate) -> String {
    day.format(DATE_KEY_FORMAT).to_string()
}

/// Normalize a raw date into a `YYYY-MM-DD` key in `tz`.
///
/// Unparseable input is returned unchanged.
pub fn normalize_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> String {
    match parse_day(raw, tz) {
        Some(day) => day_key(day),
        None => {
            tracing::warn!(date = raw, "unparseable meal date, keeping raw value");
            raw.to_owned()
        }
    }
}

/// Order two date strings by the calendar day they denote.
///
/// Unparseable values sort after every parseable one and are equal to each other,
/// so a stable sort keeps them in input order.
pub fn compare_days<Tz: TimeZone>(a: &str, b: &str, tz: &Tz) -> Ordering {
    match (parse_day(a, tz), parse_day(b, tz)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
