// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite-backed visit store.
//!
//! A bulk load rebuilds the table from scratch inside one transaction:
//! - drop and recreate `visits`
//! - insert every row through one prepared statement
//! - build the secondary indexes once the data is in place
//!
//! Queries open the database read-only, one connection per call.

use crate::db::query::{AggregateQuery, AggregateRow};
use crate::db::{indexes, VisitStore, VISITS_TABLE};
use crate::error::{AppError, Result};
use crate::models::Visit;
use crate::time_utils::{format_timestamp, DATE_FORMAT};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE {VISITS_TABLE} (
            event_id INTEGER PRIMARY KEY,
            timestamp TEXT NOT NULL,
            date TEXT NOT NULL,
            location TEXT NOT NULL,
            member_id INTEGER NOT NULL,
            membership_tier TEXT NOT NULL,
            activity_type TEXT NOT NULL,
            class_name TEXT NOT NULL,
            equipment_used TEXT NOT NULL,
            duration_min INTEGER NOT NULL,
            spend_cad REAL NOT NULL
        )"
    )
}

fn create_indexes_sql() -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {VISITS_TABLE}(date);
         CREATE INDEX IF NOT EXISTS {} ON {VISITS_TABLE}(location);
         CREATE INDEX IF NOT EXISTS {} ON {VISITS_TABLE}(activity_type);",
        indexes::DATE,
        indexes::LOCATION,
        indexes::ACTIVITY_TYPE
    )
}

fn insert_sql() -> String {
    format!(
        "INSERT INTO {VISITS_TABLE} (
            event_id, timestamp, date, location, member_id, membership_tier,
            activity_type, class_name, equipment_used, duration_min, spend_cad
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
    )
}

/// Visit store backed by a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_read_only(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AppError::Database(format!(
                "Failed to open {} read-only: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn open_for_load(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Database(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(Connection::open(&self.path)?)
    }
}

impl VisitStore for SqliteStore {
    fn load(&self, visits: &[Visit]) -> Result<usize> {
        let mut conn = self.open_for_load()?;
        let tx = conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {VISITS_TABLE}; {};",
            create_table_sql()
        ))?;

        {
            let mut stmt = tx.prepare(&insert_sql())?;
            for visit in visits {
                stmt.execute(params![
                    visit.event_id,
                    format_timestamp(visit.timestamp),
                    visit.date.format(DATE_FORMAT).to_string(),
                    visit.location,
                    visit.member_id,
                    visit.membership_tier,
                    visit.activity_type,
                    visit.class_name,
                    visit.equipment_used,
                    visit.duration_min,
                    visit.spend_cad,
                ])
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to insert event {}: {}",
                        visit.event_id, e
                    ))
                })?;
            }
        }

        tx.execute_batch(&create_indexes_sql())?;
        tx.commit()?;

        tracing::info!(
            path = %self.path.display(),
            rows = visits.len(),
            "Replaced visits table"
        );
        Ok(visits.len())
    }

    fn aggregate_many(&self, queries: &[AggregateQuery]) -> Result<Vec<Vec<AggregateRow>>> {
        let conn = self.open_read_only()?;
        queries.iter().map(|q| run_query(&conn, q)).collect()
    }
}

fn run_query(conn: &Connection, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
    let rendered = query.to_sql();
    tracing::debug!(sql = %rendered.sql, "Running aggregate query");

    let grouped = query.is_grouped();
    let measure_count = query.measure_count();
    let offset = usize::from(grouped);

    let mut stmt = conn.prepare(&rendered.sql)?;
    let rows = stmt.query_map(params_from_iter(rendered.params.iter()), |row| {
        let key = if grouped {
            Some(row.get::<_, Value>(0)?)
        } else {
            None
        };
        let measures = (0..measure_count)
            .map(|i| row.get::<_, Value>(i + offset))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(AggregateRow { key, measures })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
