// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clean the raw check-in feed into the dataset `gym-ops-load` consumes.

use anyhow::Context;
use gym_ops::{config::Config, logging::init_logging, services::clean_file};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(base_dir = %config.base_dir.display(), "Resolved data layout");
    let report = clean_file(&config.raw_events_path, &config.clean_events_path)
        .context("Cleaning failed")?;

    println!(
        "Saved cleaned data to: {} ({} rows)",
        config.clean_events_path.display(),
        report.rows_written
    );
    Ok(())
}
