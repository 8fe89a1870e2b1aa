// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cleaned dataset loading.

use crate::db::VisitStore;
use crate::models::{Visit, VISIT_COLUMNS};
use crate::services::pipeline::{missing_columns, open_input, unexpected_columns, PipelineError};
use std::io::Read;
use std::path::Path;

/// Read the cleaned dataset at `path` and bulk-replace the store contents.
///
/// Returns the number of rows written.
pub fn load_file(path: &Path, store: &dyn VisitStore) -> Result<usize, PipelineError> {
    tracing::info!(input = %path.display(), "Loading cleaned events");
    let visits = read_clean_visits(open_input(path)?)?;
    Ok(store.load(&visits)?)
}

/// Parse a cleaned dataset.
///
/// The header must name exactly the schema columns (any order). A row that
/// does not parse is a fatal error, not a skipped row.
pub fn read_clean_visits<R: Read>(input: R) -> Result<Vec<Visit>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(&headers);
    let unexpected = unexpected_columns(&headers);
    if !missing.is_empty() || !unexpected.is_empty() || headers.len() != VISIT_COLUMNS.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "expected {} columns, found {} (missing: [{}], unexpected: [{}])",
            VISIT_COLUMNS.len(),
            headers.len(),
            missing.join(", "),
            unexpected.join(", ")
        )));
    }

    let visits = reader
        .deserialize::<Visit>()
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(rows = visits.len(), "Parsed cleaned dataset");
    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;

    const CLEAN: &str = "event_id,timestamp,date,location,member_id,membership_tier,activity_type,class_name,equipment_used,duration_min,spend_cad
1,2024-01-05 07:45:00,2024-01-05,Downtown,42,Premium,Class,Yoga,,60,12.5
2,2024-01-06 18:00:00,2024-01-06,Uptown,43,Basic,Gym Visit,,Treadmill,30,0.0
";

    #[test]
    fn test_read_clean_visits() {
        let visits = read_clean_visits(CLEAN.as_bytes()).unwrap();

        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].class_name, "Yoga");
        assert_eq!(visits[0].equipment_used, "");
        assert_eq!(visits[1].equipment_used, "Treadmill");
        assert_eq!(visits[1].spend_cad, 0.0);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let body = "spend_cad,duration_min,equipment_used,class_name,activity_type,membership_tier,member_id,location,date,timestamp,event_id
1.0,20,,,Gym Visit,Basic,9,Downtown,2024-03-01,2024-03-01 06:00:00,5
";
        let visits = read_clean_visits(body.as_bytes()).unwrap();
        assert_eq!(visits[0].event_id, 5);
        assert_eq!(visits[0].duration_min, 20);
    }

    #[test]
    fn test_schema_mismatch_is_fatal() {
        let extra = CLEAN.replacen("spend_cad", "spend_cad,notes", 1);
        assert!(matches!(
            read_clean_visits(extra.as_bytes()),
            Err(PipelineError::SchemaMismatch(_))
        ));

        let missing = "event_id,timestamp,date\n1,2024-01-05 07:45:00,2024-01-05\n";
        assert!(matches!(
            read_clean_visits(missing.as_bytes()),
            Err(PipelineError::SchemaMismatch(_))
        ));

        let duplicated = CLEAN.replacen("spend_cad", "spend_cad,spend_cad", 1);
        assert!(matches!(
            read_clean_visits(duplicated.as_bytes()),
            Err(PipelineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let body = CLEAN.replace("2024-01-06 18:00:00", "yesterday evening");
        assert!(matches!(
            read_clean_visits(body.as_bytes()),
            Err(PipelineError::Csv(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("clean.csv");
        std::fs::write(&csv_path, CLEAN).unwrap();
        let store = SqliteStore::new(dir.path().join("app.db"));

        assert_eq!(load_file(&csv_path, &store).unwrap(), 2);
        assert_eq!(load_file(&csv_path, &store).unwrap(), 2);

        let absent = dir.path().join("absent.csv");
        assert!(matches!(
            load_file(&absent, &store),
            Err(PipelineError::Io { .. })
        ));
    }
}
