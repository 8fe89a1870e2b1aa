// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use gym_ops::config::Config;
use gym_ops::db::{SqliteStore, VisitStore};
use gym_ops::models::Visit;
use gym_ops::routes::create_router;
use gym_ops::services::AnalyticsService;
use gym_ops::AppState;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a visit from a `YYYY-MM-DD HH:MM:SS` timestamp.
#[allow(dead_code, clippy::too_many_arguments)]
pub fn visit(
    event_id: i64,
    timestamp: &str,
    member_id: i64,
    activity_type: &str,
    class_name: &str,
    equipment_used: &str,
    duration_min: i64,
    spend_cad: f64,
) -> Visit {
    let timestamp = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        .expect("fixture timestamp");
    Visit {
        event_id,
        timestamp,
        date: timestamp.date(),
        location: "Downtown".to_string(),
        member_id,
        membership_tier: "Basic".to_string(),
        activity_type: activity_type.to_string(),
        class_name: class_name.to_string(),
        equipment_used: equipment_used.to_string(),
        duration_min,
        spend_cad,
    }
}

/// Ten January 2024 visits.
///
/// Totals over the whole month: 10 visits, 6 members, 44.0 min average,
/// 73.50 spend, busiest hour 18. Classes: Yoga 3, Spin 1 (plus one unnamed).
/// Equipment: Treadmill 3, Rower 1 (plus one unnamed).
#[allow(dead_code)]
pub fn january_visits() -> Vec<Visit> {
    vec![
        visit(1, "2024-01-01 06:10:00", 1, "Class", "Yoga", "", 60, 15.0),
        visit(2, "2024-01-01 18:05:00", 2, "Gym Visit", "", "Treadmill", 45, 0.0),
        visit(3, "2024-01-02 18:30:00", 1, "Class", "Spin", "", 50, 12.5),
        visit(4, "2024-01-03 07:00:00", 3, "Class", "Yoga", "", 55, 15.0),
        visit(5, "2024-01-07 18:45:00", 2, "Gym Visit", "", "Rower", 30, 0.0),
        visit(6, "2024-01-08 12:00:00", 4, "Gym Visit", "", "Treadmill", 40, 3.75),
        visit(7, "2024-01-10 18:00:00", 4, "Class", "Yoga", "", 60, 15.0),
        visit(8, "2024-01-10 09:00:00", 5, "Gym Visit", "", "", 20, 0.0),
        visit(9, "2024-01-15 19:00:00", 1, "Class", "", "", 45, 10.0),
        visit(10, "2024-01-31 18:20:00", 6, "Gym Visit", "", "Treadmill", 35, 2.25),
    ]
}

/// Create a test app backed by a fresh SQLite store holding `visits`.
///
/// The returned directory must outlive the router.
#[allow(dead_code)]
pub fn create_test_app_with(visits: &[Visit]) -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::for_base_dir(dir.path());
    let store = SqliteStore::new(&config.db_path);
    store.load(visits).expect("Failed to load fixture visits");

    let state = Arc::new(AppState {
        analytics: AnalyticsService::new(Arc::new(store)),
    });
    (create_router(state.clone()), state, dir)
}

/// Create a test app with the January fixture loaded.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>, TempDir) {
    create_test_app_with(&january_visits())
}

/// Create an app over an existing base directory, without loading anything.
#[allow(dead_code)]
pub fn create_app_for_config(config: Config) -> Router {
    let store = SqliteStore::new(&config.db_path);
    create_router(Arc::new(AppState {
        analytics: AnalyticsService::new(Arc::new(store)),
    }))
}

/// GET `uri` and decode the JSON body (`Null` if the body is not JSON).
#[allow(dead_code)]
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}
