//! Loose timestamp parsing for the `Last Updated Date/Time` field.
//!
//! Accepts `Saturday 14th February 2026 19:30:55` and the year-less
//! `Saturday 14th February 19:30:55`. A missing year is inferred.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDateTime, Weekday};
use regex::Regex;

/// Shorter inputs cannot hold a weekday, day, month and time.
const MIN_TIMESTAMP_LEN: usize = 10;

/// Day, month name, 4-digit year, time. The weekday is split off first.
const FORMAT_WITH_YEAR: &str = "%d %B %Y %H:%M:%S";

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:st|nd|rd|th)").expect("static regex"));

/// Parse a timestamp relative to the local clock.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp_at(raw, Local::now().naive_local())
}

/// Parse a timestamp, inferring a missing year relative to `now`.
///
/// The year-less form takes the year of `now`, or the previous year when
/// that would put the timestamp in the future. Returns `None` for empty,
/// bracketed (`[unparsed]`), too short, or otherwise unparseable input.
pub fn parse_timestamp_at(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('[') || raw.chars().count() < MIN_TIMESTAMP_LEN {
        return None;
    }
    let cleaned = ORDINAL_SUFFIX.replace_all(raw, "$1");

    let (weekday, rest) = cleaned.split_once(char::is_whitespace)?;
    weekday.parse::<Weekday>().ok()?;
    let rest = rest.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(rest, FORMAT_WITH_YEAR) {
        return Some(dt);
    }

    // Year-less form: `D Month HH:MM:SS`.
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [day, month, time] = parts.as_slice() else {
        return None;
    };
    let with_year = format!("{day} {month} {} {time}", now.year());
    let dt = NaiveDateTime::parse_from_str(&with_year, FORMAT_WITH_YEAR).ok()?;
    if dt > now {
        dt.with_year(now.year() - 1)
    } else {
        Some(dt)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary input never panics.
        #[test]
        fn never_panics(raw in ".{0,64}") {
            let _ = parse_timestamp(&raw);
        }

        /// Year-less timestamps are never placed after `now`.
        #[test]
        fn yearless_never_in_future(
            day in 1u32..=28,
            month in 0usize..12,
            hour in 0u32..24,
            now_day in 1u32..=28,
            now_month in 1u32..=12,
        ) {
            const MONTHS: [&str; 12] = [
                "January", "February", "March", "April", "May", "June", "July",
                "August", "September", "October", "November", "December",
            ];
            let now = chrono::NaiveDate::from_ymd_opt(2026, now_month, now_day)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .expect("valid date");
            let raw = format!("Monday {day} {} {hour:02}:15:00", MONTHS[month]);
            let dt = parse_timestamp_at(&raw, now).expect("parses");
            prop_assert!(dt <= now);
            prop_assert!(dt.year() == 2026 || dt.year() == 2025);
        }
    }
}
