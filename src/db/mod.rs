// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).

pub mod query;
pub mod sqlite;

pub use query::{AggregateQuery, AggregateRow, Column, GroupKey, Measure, Order};
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::Visit;

/// Table holding every loaded visit.
pub const VISITS_TABLE: &str = "visits";

/// Secondary index names, one per commonly filtered column.
pub mod indexes {
    pub const DATE: &str = "idx_visits_date";
    pub const LOCATION: &str = "idx_visits_location";
    pub const ACTIVITY_TYPE: &str = "idx_visits_activity";
}

/// Storage backend for visits.
///
/// Writes only happen through [`VisitStore::load`], which replaces the whole
/// dataset. Reads are aggregate queries; each call to
/// [`VisitStore::aggregate_many`] uses its own connection and releases it
/// before returning.
pub trait VisitStore: Send + Sync {
    /// Replace all stored visits with `visits`, returning the row count written.
    fn load(&self, visits: &[Visit]) -> Result<usize>;

    /// Run several queries on one connection, results in query order.
    fn aggregate_many(&self, queries: &[AggregateQuery]) -> Result<Vec<Vec<AggregateRow>>>;

    /// Run a single query.
    fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        let mut results = self.aggregate_many(std::slice::from_ref(query))?;
        Ok(results.pop().unwrap_or_default())
    }
}
