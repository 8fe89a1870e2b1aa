// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared plumbing for the offline clean/load batch jobs.

use crate::error::AppError;
use crate::models::VISIT_COLUMNS;
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Errors from the batch pipeline. All of them are fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected at most {expected} fields, found {found}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Column mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Store error: {0}")]
    Store(#[from] AppError),
}

pub(crate) fn open_input(path: &Path) -> Result<File, PipelineError> {
    File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `path` for writing, creating missing parent directories.
pub(crate) fn create_output(path: &Path) -> Result<File, PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Schema columns absent from `headers`.
pub(crate) fn missing_columns(headers: &StringRecord) -> Vec<&'static str> {
    VISIT_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect()
}

/// Header columns that are not part of the schema.
pub(crate) fn unexpected_columns(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(str::trim)
        .filter(|h| !VISIT_COLUMNS.contains(h))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_checks() {
        let headers = StringRecord::from(vec![
            "event_id", "timestamp", "date", "location", "member_id", "activity_type",
            "duration_min", "spend_cad", "notes",
        ]);

        assert_eq!(
            missing_columns(&headers),
            vec!["membership_tier", "class_name", "equipment_used"]
        );
        assert_eq!(unexpected_columns(&headers), vec!["notes".to_string()]);

        let exact = StringRecord::from(VISIT_COLUMNS.to_vec());
        assert!(missing_columns(&exact).is_empty());
        assert!(unexpected_columns(&exact).is_empty());
    }

    #[test]
    fn test_missing_input_names_the_path() {
        let err = open_input(Path::new("/nonexistent/gym_events.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gym_events.csv"));
    }
}
