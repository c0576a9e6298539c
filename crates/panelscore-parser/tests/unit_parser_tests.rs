//! Unit tests for the feature spec parser
//!
//! Covers full documents, defaults, the optional wrapper key and every
//! configuration error the parser reports before any computation runs.

use panelscore_core::{Direction, StatFunction, TimeUnit, WindowingLag};
use panelscore_parser::*;

// =============================================================================
// Full Document Tests
// =============================================================================

#[test]
fn test_parse_full_spec() {
    let yaml = r#"
version: "0.1"

feature_spec:
  targets: [sales, visits]
  sort_column: date
  grouping_vars: [store, dept]
  rank_column: recency
  lags: [0, 1, 2, 7]
  periods: [7, 3]
  stats:
    - { name: MA, function: mean }
    - { name: SD, function: sd }
    - { name: Q90, function: quantile90 }
  time_gap_name: TimeGap
  time_unit: week
  windowing_lag: 0
  direction: lead
  records_keep: 3
  simple_impute: false
  drop_rank_column: false
"#;

    let spec = FeatureSpecParser::parse(yaml).unwrap();
    assert_eq!(spec.targets, vec!["sales", "visits"]);
    assert_eq!(spec.sort_column, "date");
    assert_eq!(spec.grouping_vars, vec!["store", "dept"]);
    assert_eq!(spec.rank_column, "recency");
    assert_eq!(spec.lags, vec![0, 1, 2, 7]);
    assert_eq!(spec.periods, vec![7, 3]);
    assert_eq!(spec.sorted_periods(), vec![3, 7]);
    assert_eq!(spec.stats.len(), 3);
    assert_eq!(spec.stats[2].name, "Q90");
    assert_eq!(spec.stats[2].function, StatFunction::Quantile(90));
    assert_eq!(spec.time_gap_name.as_deref(), Some("TimeGap"));
    assert_eq!(spec.time_unit, TimeUnit::Week);
    assert_eq!(spec.windowing_lag, WindowingLag::Current);
    assert_eq!(spec.direction, Direction::Lead);
    assert_eq!(spec.records_keep, 3);
    assert!(!spec.simple_impute);
    assert!(!spec.drop_rank_column);
}

#[test]
fn test_parse_bare_mapping_uses_defaults() {
    let yaml = r#"
targets: sales
sort_column: date
lags: [1]
periods: [2]
stats: [mean, median]
"#;

    let spec = FeatureSpecParser::parse(yaml).unwrap();
    assert_eq!(spec.targets, vec!["sales"]);
    assert!(spec.grouping_vars.is_empty());
    assert_eq!(spec.rank_column, "rank");
    assert_eq!(spec.windowing_lag, WindowingLag::Baseline);
    assert_eq!(spec.direction, Direction::Lag);
    assert_eq!(spec.time_unit, TimeUnit::Day);
    assert_eq!(spec.stats[0].name, "mean");
    assert_eq!(spec.stats[1].function, StatFunction::Median);
    assert!(spec.simple_impute);
    assert!(spec.drop_rank_column);
}

#[test]
fn test_parse_matches_builder() {
    let yaml = r#"
feature_spec:
  targets: [sales]
  sort_column: date
  grouping_vars: [store]
  lags: [1, 2]
  periods: [2]
  stats:
    - { name: MA, function: avg }
"#;

    let parsed = FeatureSpecParser::parse(yaml).unwrap();
    let built = panelscore_core::FeatureSpec::new(["sales"], "date")
        .with_grouping_vars(["store"])
        .with_lags([1, 2])
        .with_periods([2])
        .with_stat("MA", StatFunction::Mean);
    assert_eq!(parsed, built);
}

// =============================================================================
// Configuration Error Tests
// =============================================================================

fn expect_config_error(yaml: &str) {
    let result = FeatureSpecParser::parse(yaml);
    assert!(
        matches!(result, Err(ParseError::ConfigError(_))),
        "expected config error, got {:?}",
        result
    );
}

#[test]
fn test_negative_lag_is_config_error() {
    expect_config_error("targets: [x]\nsort_column: t\nlags: [1, -2]\n");
}

#[test]
fn test_non_positive_records_keep_is_config_error() {
    expect_config_error("targets: [x]\nsort_column: t\nrecords_keep: 0\n");
    expect_config_error("targets: [x]\nsort_column: t\nrecords_keep: -3\n");
}

#[test]
fn test_invalid_enums_are_config_errors() {
    expect_config_error("targets: [x]\nsort_column: t\ndirection: sideways\n");
    expect_config_error("targets: [x]\nsort_column: t\nwindowing_lag: 2\n");
    expect_config_error("targets: [x]\nsort_column: t\nwindowing_lag: -1\n");
    expect_config_error("targets: [x]\nsort_column: t\ntime_gap_name: Gap\ntime_unit: fortnight\n");
}

#[test]
fn test_unknown_stat_is_config_error() {
    expect_config_error("targets: [x]\nsort_column: t\nperiods: [3]\nstats: [kurtosis]\n");
}

#[test]
fn test_empty_targets_is_config_error() {
    expect_config_error("targets: []\nsort_column: t\n");
}

#[test]
fn test_stats_without_periods_is_config_error() {
    expect_config_error("targets: [x]\nsort_column: t\nstats: [mean]\n");
}

// =============================================================================
// Structural Error Tests
// =============================================================================

#[test]
fn test_missing_sort_column() {
    let err = FeatureSpecParser::parse("targets: [x]\n").unwrap_err();
    assert!(matches!(err, ParseError::MissingField { ref field } if field == "sort_column"));
}

#[test]
fn test_unknown_field_with_suggestion() {
    let err = FeatureSpecParser::parse("targets: [x]\nsort_column: t\ngroup_by: [store]\n").unwrap_err();
    match err {
        ParseError::UnknownField(message) => {
            assert!(message.contains("group_by"));
            assert!(message.contains("grouping_vars"));
        }
        other => panic!("expected UnknownField, got {:?}", other),
    }
}

#[test]
fn test_wrong_type() {
    let err = FeatureSpecParser::parse("targets: [x]\nsort_column: t\nsimple_impute: yes please\n")
        .unwrap_err();
    assert!(matches!(err, ParseError::TypeMismatch { .. }));
}

#[test]
fn test_malformed_yaml() {
    let err = FeatureSpecParser::parse("targets: [x\n").unwrap_err();
    assert!(matches!(err, ParseError::YamlError(_)));
}

#[test]
fn test_non_mapping_document() {
    let err = FeatureSpecParser::parse("- just\n- a list\n").unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue { .. }));
}
