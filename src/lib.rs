// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym Ops: check-in analytics for a chain of gyms
//!
//! This crate cleans raw check-in events, loads them into SQLite, and serves
//! a small read-only API of KPIs, trends and top-N reports over a date range.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use services::AnalyticsService;

/// Shared application state.
pub struct AppState {
    pub analytics: AnalyticsService,
}
