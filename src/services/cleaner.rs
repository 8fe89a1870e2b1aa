// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw check-in feed cleaning.
//!
//! Turns the untyped raw feed into the cleaned dataset the loader consumes.
//! Bad rows are dropped, never reported as errors; only an unreadable feed
//! (missing file, broken CSV, missing columns) fails the run.

use crate::models::visit::{MAX_DURATION_MIN, MIN_DURATION_MIN};
use crate::models::{RawVisit, Visit, VISIT_COLUMNS};
use crate::services::pipeline::{create_output, missing_columns, open_input, PipelineError};
use crate::time_utils::{parse_date, parse_timestamp};
use std::io::{Read, Write};
use std::path::Path;

/// Cell values the raw feed uses for "no value".
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Outcome of a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub rows_read: usize,
    pub rows_written: usize,
}

impl CleanReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_written
    }
}

/// Clean the raw feed at `raw_path` into `out_path`.
pub fn clean_file(raw_path: &Path, out_path: &Path) -> Result<CleanReport, PipelineError> {
    tracing::info!(input = %raw_path.display(), output = %out_path.display(), "Cleaning raw events");
    let input = open_input(raw_path)?;
    let output = create_output(out_path)?;
    clean_records(input, output)
}

/// Clean a raw CSV stream into a cleaned CSV stream.
///
/// The output always starts with the schema header, even when no row survives.
/// Rows with fewer cells than the header are cleaned like any other row;
/// rows with more cells make the feed malformed.
pub fn clean_records<R: Read, W: Write>(
    input: R,
    output: W,
) -> Result<CleanReport, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(PipelineError::SchemaMismatch(format!(
            "raw feed is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(VISIT_COLUMNS)?;

    let mut report = CleanReport::default();
    for record in reader.records() {
        let mut record = record?;
        if record.len() > headers.len() {
            return Err(PipelineError::RowTooLong {
                line: record.position().map_or(0, |pos| pos.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        // Short rows are padded; their absent cells read as missing.
        while record.len() < headers.len() {
            record.push_field("");
        }

        let raw: RawVisit = record.deserialize(Some(&headers))?;
        report.rows_read += 1;
        if let Some(visit) = clean_row(&raw) {
            writer.serialize(&visit)?;
            report.rows_written += 1;
        }
    }
    writer.flush().map_err(csv::Error::from)?;

    tracing::info!(
        rows_read = report.rows_read,
        rows_written = report.rows_written,
        rows_dropped = report.rows_dropped(),
        "Cleaned raw events"
    );
    Ok(report)
}

/// Type and validate one raw row, `None` if it must be dropped.
pub fn clean_row(raw: &RawVisit) -> Option<Visit> {
    let timestamp = present(&raw.timestamp).and_then(parse_timestamp)?;
    let date = present(&raw.date).and_then(parse_date)?;
    let duration = present(&raw.duration_min).and_then(parse_number)?;
    let spend_cad = present(&raw.spend_cad)
        .and_then(parse_number)
        .unwrap_or(0.0);

    let location = present(&raw.location)?;
    let member_id = present(&raw.member_id).and_then(parse_integer)?;
    let activity_type = present(&raw.activity_type)?;
    let event_id = present(&raw.event_id).and_then(parse_integer)?;

    if !(MIN_DURATION_MIN as f64..=MAX_DURATION_MIN as f64).contains(&duration) {
        return None;
    }

    Some(Visit {
        event_id,
        timestamp,
        date,
        location: location.to_string(),
        member_id,
        membership_tier: text(&raw.membership_tier),
        activity_type: activity_type.to_string(),
        class_name: text(&raw.class_name),
        equipment_used: text(&raw.equipment_used),
        duration_min: duration.round() as i64,
        spend_cad,
    })
}

/// Trimmed cell contents, `None` for empty cells and NA markers.
fn present(cell: &Option<String>) -> Option<&str> {
    cell.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !NA_MARKERS.contains(s))
}

fn text(cell: &Option<String>) -> String {
    present(cell).unwrap_or_default().to_string()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers, also written as integral floats ("1042.0").
fn parse_integer(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        parse_number(raw)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}
