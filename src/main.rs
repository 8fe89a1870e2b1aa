// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym Ops API Server
//!
//! Serves read-only KPI, trend and top-N reports over the visits loaded by
//! `gym-ops-load`.

use anyhow::Context;
use gym_ops::{
    config::Config, db::SqliteStore, logging::init_logging, services::AnalyticsService, AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        base_dir = %config.base_dir.display(),
        "Starting Gym Ops API"
    );

    if !config.db_path.exists() {
        tracing::warn!(
            path = %config.db_path.display(),
            "Database not found; run gym-ops-clean and gym-ops-load first"
        );
    }
    let store = SqliteStore::new(&config.db_path);
    tracing::info!(path = %store.path().display(), "Using SQLite store");

    let state = Arc::new(AppState {
        analytics: AnalyticsService::new(Arc::new(store)),
    });

    let app = gym_ops::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
