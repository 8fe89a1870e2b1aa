// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Storage format for `visits.timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Storage and query-parameter format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a strict `YYYY-MM-DD` request parameter.
pub fn parse_query_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parse a raw feed timestamp.
///
/// Offsets are dropped, keeping the local wall-clock time. A bare date is
/// treated as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a raw feed calendar date, accepting full timestamps as well.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

/// Format a timestamp the way it is stored in `visits.timestamp`.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Round to a fixed number of decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_date_is_strict() {
        assert_eq!(
            parse_query_date("2024-01-31"),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert!(parse_query_date("2024/01/01").is_none());
        assert!(parse_query_date("2024-02-30").is_none());
        assert!(parse_query_date("2024-01-01T00:00:00").is_none());
        assert!(parse_query_date("").is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-05 07:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T07:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 07:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T07:30:00-08:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-03-05 07:30:00.000 "), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0)
        );
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-05 07:30:00").is_none());
    }

    #[test]
    fn test_parse_date_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05"), expected);
        assert_eq!(parse_date("2024-03-05 23:59:59"), expected);
        assert!(parse_date("05/03/2024").is_none());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(17, 4, 9)
            .unwrap();
        assert_eq!(format_timestamp(ts), "2024-03-05 17:04:09");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(47.25, 1), 47.3);
        assert_eq!(round_to(12.344, 2), 12.34);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
