// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym check-in records, raw and cleaned.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column names of the cleaned dataset and of the `visits` table, in order.
pub const VISIT_COLUMNS: [&str; 11] = [
    "event_id",
    "timestamp",
    "date",
    "location",
    "member_id",
    "membership_tier",
    "activity_type",
    "class_name",
    "equipment_used",
    "duration_min",
    "spend_cad",
];

/// `activity_type` value for instructor-led classes.
pub const ACTIVITY_CLASS: &str = "Class";
/// `activity_type` value for open gym sessions.
pub const ACTIVITY_GYM_VISIT: &str = "Gym Visit";

/// Shortest visit kept by the cleaner (minutes, inclusive).
pub const MIN_DURATION_MIN: i64 = 5;
/// Longest visit kept by the cleaner (minutes, inclusive).
pub const MAX_DURATION_MIN: i64 = 300;

/// One cleaned check-in event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Unique event identifier (primary key)
    pub event_id: i64,
    /// Check-in wall-clock time
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// Calendar date used for range filtering
    pub date: NaiveDate,
    /// Facility name
    pub location: String,
    /// Member identifier (many visits per member)
    pub member_id: i64,
    pub membership_tier: String,
    /// "Class", "Gym Visit", ...
    pub activity_type: String,
    /// Empty unless `activity_type` is "Class"
    pub class_name: String,
    /// Empty unless `activity_type` is "Gym Visit"
    pub equipment_used: String,
    /// Whole minutes, always within [5, 300]
    pub duration_min: i64,
    /// Spend in CAD, 0.0 when the feed had none
    pub spend_cad: f64,
}

/// One row of the raw event feed, before any typing.
///
/// Unknown columns are ignored; a missing known column is caught by the
/// cleaner's header check before deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVisit {
    pub event_id: Option<String>,
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub member_id: Option<String>,
    pub membership_tier: Option<String>,
    pub activity_type: Option<String>,
    pub class_name: Option<String>,
    pub equipment_used: Option<String>,
    pub duration_min: Option<String>,
    pub spend_cad: Option<String>,
}

/// Serde adapter storing timestamps as `YYYY-MM-DD HH:MM:SS`.
mod timestamp_format {
    use crate::time_utils::{format_timestamp, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(*ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
