//! Integration tests for building engines from spec files and scoring tables

mod common;

use common::{engine_from_yaml, numbers, spec_file, store_table};
use panelscore_sdk::{ScoringEngineBuilder, SdkError, Value};

const STORE_SPEC: &str = r#"
feature_spec:
  targets: [sales]
  sort_column: date
  grouping_vars: [store]
  lags: [1, 2]
  periods: [2]
  stats:
    - { name: MA, function: mean }
    - { name: MAX, function: max }
  time_gap_name: TimeGap
  time_unit: day
"#;

// ============================================================================
// Spec Loading
// ============================================================================

#[test]
fn test_engine_from_spec_file() {
    let file = spec_file(STORE_SPEC);
    let engine = ScoringEngineBuilder::new()
        .with_spec_file(file.path())
        .build()
        .unwrap();

    assert_eq!(engine.spec().grouping_vars, vec!["store"]);
    assert_eq!(engine.plan().max_cols, 2);
    assert_eq!(engine.plan().history_depth, 2);
}

#[test]
fn test_invalid_spec_file() {
    let file = spec_file("feature_spec:\n  targets: [sales]\n  sort_column: date\n  records_keep: 0\n");
    let err = ScoringEngineBuilder::new()
        .with_spec_file(file.path())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, SdkError::ParseError(_)));
}

#[test]
fn test_malformed_yaml() {
    let err = ScoringEngineBuilder::new()
        .with_spec_content("feature_spec: [unclosed")
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, SdkError::ParseError(_)));
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn test_score_store_panel() {
    let engine = engine_from_yaml(STORE_SPEC);
    let output = engine.score(&store_table()).unwrap();

    assert_eq!(
        output.column_names(),
        &[
            "store",
            "date",
            "sales",
            "store_LAG_1_sales",
            "store_LAG_2_sales",
            "store_TimeGap_1",
            "store_TimeGap_2",
            "store_MA_2_sales",
            "store_MAX_2_sales",
            "store_MA_2_TimeGap",
            "store_MAX_2_TimeGap",
        ]
    );
    assert_eq!(output.num_rows(), 2);
    assert_eq!(output.value(0, "store").unwrap(), Value::from("s1"));

    assert_eq!(numbers(&output, "store_LAG_1_sales"), vec![Some(20.0), Some(5.0)]);
    assert_eq!(numbers(&output, "store_LAG_2_sales"), vec![Some(10.0), Some(-1.0)]);
    assert_eq!(numbers(&output, "store_MA_2_sales"), vec![Some(15.0), Some(5.0)]);
    assert_eq!(numbers(&output, "store_MAX_2_sales"), vec![Some(20.0), Some(5.0)]);
    // s1 visited on days 0, 2, 3; s2 on days 1, 4
    assert_eq!(numbers(&output, "store_TimeGap_1"), vec![Some(1.0), Some(3.0)]);
    assert_eq!(numbers(&output, "store_TimeGap_2"), vec![Some(2.0), Some(-1.0)]);
    // channels 1..2 are rolled; s2 has only channel 1
    assert_eq!(numbers(&output, "store_MA_2_TimeGap"), vec![Some(1.5), Some(3.0)]);
    assert_eq!(numbers(&output, "store_MAX_2_TimeGap"), vec![Some(2.0), Some(3.0)]);
}

#[test]
fn test_full_history_and_metrics() {
    let engine = engine_from_yaml(STORE_SPEC);
    let table = store_table();

    let history = engine.full_history(&table).unwrap();
    assert_eq!(history.num_rows(), 5);

    let output = engine.score_with_metrics(&table).unwrap();
    assert_eq!(output.metrics.rows_in.get(), 5);
    assert_eq!(output.metrics.rows_out.get(), 2);
    assert_eq!(output.metrics.entities.get(), 2);
    assert!(output.metrics.imputed_cells.get() > 0);
}

#[test]
fn test_output_schema_matches_scored_columns() {
    let engine = engine_from_yaml(STORE_SPEC);
    let table = store_table();
    let schema = engine.output_schema(table.column_names()).unwrap();
    let output = engine.score(&table).unwrap();
    assert_eq!(schema.column_names(), output.column_names());
}

#[test]
fn test_missing_rank_column_is_runtime_error() {
    let engine = engine_from_yaml(STORE_SPEC);
    let mut table = store_table();
    table.drop_column("rank").unwrap();

    let err = engine.score(&table).unwrap_err();
    assert!(matches!(err, SdkError::RuntimeError(_)));
    assert!(engine.full_history(&table).is_ok());
}
