// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report routes. All of them take an inclusive `start`/`end` date range.

use crate::error::{AppError, Result};
use crate::models::{
    DateRange, Freq, Kpis, TopClassesResponse, TopEquipmentResponse, TrendResponse,
};
use crate::time_utils::parse_query_date;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_TOP_LIMIT: u32 = 10;
const MAX_TOP_LIMIT: u32 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/kpis", get(get_kpis))
        .route("/trend/checkins", get(get_checkin_trend))
        .route("/top/classes", get(get_top_classes))
        .route("/top/equipment", get(get_top_equipment))
}

// ─── Parameter Parsing ───────────────────────────────────────

// Parameters arrive as raw strings so every validation failure gets the same
// JSON error body instead of the extractor's plain-text rejection.

#[derive(Deserialize)]
struct RangeQuery {
    /// YYYY-MM-DD, inclusive
    start: Option<String>,
    /// YYYY-MM-DD, inclusive
    end: Option<String>,
}

#[derive(Deserialize)]
struct TrendQuery {
    start: Option<String>,
    end: Option<String>,
    /// "day" (default) or "week"
    freq: Option<String>,
}

#[derive(Deserialize)]
struct TopQuery {
    start: Option<String>,
    end: Option<String>,
    /// 1-50, default 10
    limit: Option<String>,
}

fn parse_date_param(name: &str, raw: Option<&str>) -> Result<chrono::NaiveDate> {
    let raw = raw.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required parameter '{}'", name))
    })?;
    parse_query_date(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid '{}' parameter: expected YYYY-MM-DD, got '{}'",
            name, raw
        ))
    })
}

/// Parse the date range. `start > end` is not rejected; it matches no visits.
fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
    Ok(DateRange::new(
        parse_date_param("start", start)?,
        parse_date_param("end", end)?,
    ))
}

fn parse_freq(raw: Option<&str>) -> Result<Freq> {
    match raw {
        None => Ok(Freq::default()),
        Some(raw) => Freq::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid 'freq' parameter: expected 'day' or 'week', got '{}'",
                raw
            ))
        }),
    }
}

fn parse_limit(raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOP_LIMIT);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|limit| (1..=MAX_TOP_LIMIT).contains(limit))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid 'limit' parameter: must be an integer between 1 and {}",
                MAX_TOP_LIMIT
            ))
        })
}

// ─── Handlers ────────────────────────────────────────────────

/// Headline KPIs for the range.
async fn get_kpis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Kpis>> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    tracing::debug!(start = %range.start, end = %range.end, "Computing KPIs");

    Ok(Json(state.analytics.kpis(range).await?))
}

/// Check-in counts per day or week.
async fn get_checkin_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<TrendResponse>> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    let freq = parse_freq(params.freq.as_deref())?;
    tracing::debug!(start = %range.start, end = %range.end, ?freq, "Computing check-in trend");

    Ok(Json(state.analytics.checkin_trend(range, freq).await?))
}

async fn get_top_classes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopQuery>,
) -> Result<Json<TopClassesResponse>> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    Ok(Json(state.analytics.top_classes(range, limit).await?))
}

async fn get_top_equipment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopQuery>,
) -> Result<Json<TopEquipmentResponse>> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    Ok(Json(state.analytics.top_equipment(range, limit).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), 10);
        assert_eq!(parse_limit(Some("1")).unwrap(), 1);
        assert_eq!(parse_limit(Some("50")).unwrap(), 50);
        for bad in ["0", "51", "-1", "ten", "", "2.5"] {
            assert!(
                matches!(parse_limit(Some(bad)), Err(AppError::BadRequest(_))),
                "limit {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_freq() {
        assert_eq!(parse_freq(None).unwrap(), Freq::Day);
        assert_eq!(parse_freq(Some("week")).unwrap(), Freq::Week);
        assert!(parse_freq(Some("month")).is_err());
        assert!(parse_freq(Some("Day")).is_err());
    }

    #[test]
    fn test_inverted_range_is_accepted() {
        let range = parse_range(Some("2024-02-01"), Some("2024-01-01")).unwrap();
        assert!(range.start > range.end);
    }

    #[test]
    fn test_parse_range_errors_name_the_parameter() {
        let err = parse_range(None, Some("2024-01-01")).unwrap_err();
        assert!(err.to_string().contains("'start'"));

        let err = parse_range(Some("2024-01-01"), Some("2024/01/31")).unwrap_err();
        assert!(err.to_string().contains("'end'"));
    }
}
