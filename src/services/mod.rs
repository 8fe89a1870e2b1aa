// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - batch pipeline and reporting logic.

pub mod analytics;
pub mod cleaner;
pub mod loader;
pub mod pipeline;

pub use analytics::AnalyticsService;
pub use cleaner::{clean_file, clean_records, CleanReport};
pub use loader::{load_file, read_clean_visits};
pub use pipeline::PipelineError;
