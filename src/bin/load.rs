// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rebuild the SQLite `visits` table from the cleaned dataset.

use anyhow::Context;
use gym_ops::{config::Config, db::SqliteStore, logging::init_logging, services::load_file};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(base_dir = %config.base_dir.display(), "Resolved data layout");
    let store = SqliteStore::new(&config.db_path);
    let rows = load_file(&config.clean_events_path, &store).context("Loading failed")?;

    println!(
        "Created {} and loaded {} rows from {}",
        config.db_path.display(),
        rows,
        config.clean_events_path.display()
    );
    Ok(())
}
