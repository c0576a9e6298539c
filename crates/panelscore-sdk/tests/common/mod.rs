//! Common test utilities for SDK integration tests

use chrono::{Duration, NaiveDate};
use panelscore_sdk::{Column, ScoringEngine, ScoringEngineBuilder, Table};
use std::io::Write;
use tempfile::NamedTempFile;

/// Store panel: two stores with daily visits and a caller-supplied rank
pub fn store_table() -> Table {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let days = [0, 2, 3, 1, 4];
    let dates: Vec<_> = days.iter().map(|&d| start + Duration::days(d)).collect();

    Table::new()
        .with_column("store", Column::from_strs(&["s1", "s1", "s1", "s2", "s2"]))
        .unwrap()
        .with_column("date", Column::from_timestamps(&dates))
        .unwrap()
        .with_column("sales", Column::from_f64s(&[10.0, 20.0, 30.0, 5.0, 15.0]))
        .unwrap()
        .with_column("rank", Column::from_f64s(&[3.0, 2.0, 1.0, 2.0, 1.0]))
        .unwrap()
}

/// Write YAML to a temp file that lives as long as the returned handle
pub fn spec_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Build an engine from inline YAML
pub fn engine_from_yaml(yaml: &str) -> ScoringEngine {
    ScoringEngineBuilder::new()
        .with_spec_content(yaml)
        .build()
        .unwrap()
}

/// Numeric column as a plain vector
pub fn numbers(table: &Table, column: &str) -> Vec<Option<f64>> {
    table.numbers(column).unwrap().to_vec()
}
