//! Scoring versus full-history consistency on a larger panel

use chrono::{Duration, NaiveDate, NaiveDateTime};
use panelscore_core::{Column, Direction, FeatureSpec, StatFunction, Table, TimeUnit, Value};
use panelscore_runtime::{FeatureEngine, WindowPlanner};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// Three stores with uneven histories, irregular dates, one missing sale and
/// ranks counting back from the latest visit
fn panel() -> Table {
    let histories: [(&str, &[i64], &[Option<f64>], &[f64]); 3] = [
        (
            "north",
            &[0, 1, 3, 4, 8, 9, 15],
            &[Some(12.0), Some(7.5), None, Some(3.0), Some(9.0), Some(11.0), Some(4.0)],
            &[1.0, 0.5, 2.0, 1.5, 0.0, 3.0, 2.5],
        ),
        (
            "east",
            &[2, 5],
            &[Some(40.0), Some(10.0)],
            &[4.0, 1.0],
        ),
        (
            "south",
            &[1, 2, 6, 7, 10],
            &[Some(1.0), Some(2.0), Some(4.0), Some(8.0), Some(16.0)],
            &[0.1, 0.2, 0.3, 0.4, 0.5],
        ),
    ];

    let mut stores = Vec::new();
    let mut dates = Vec::new();
    let mut day_index = Vec::new();
    let mut sales = Vec::new();
    let mut returns = Vec::new();
    let mut ranks = Vec::new();
    for (store, days, store_sales, store_returns) in histories {
        for (i, &d) in days.iter().enumerate() {
            stores.push(store);
            dates.push(start() + Duration::days(d));
            day_index.push(d as f64);
            sales.push(store_sales[i]);
            returns.push(store_returns[i]);
            ranks.push((days.len() - i) as f64);
        }
    }

    Table::new()
        .with_column("store", Column::from_strs(&stores))
        .unwrap()
        .with_column("date", Column::from_timestamps(&dates))
        .unwrap()
        .with_column("day", Column::from_f64s(&day_index))
        .unwrap()
        .with_column("sales", Column::Number(sales))
        .unwrap()
        .with_column("returns", Column::from_f64s(&returns))
        .unwrap()
        .with_column("rank", Column::from_f64s(&ranks))
        .unwrap()
}

fn spec() -> FeatureSpec {
    FeatureSpec::new(["sales", "returns"], "date")
        .with_grouping_vars(["store"])
        .with_lags([1, 3])
        .with_periods([2, 3])
        .with_stat("MA", StatFunction::Mean)
        .with_stat("SD", StatFunction::Sd)
        .with_stat("MAX", StatFunction::Max)
        .with_stat("Q75", StatFunction::Quantile(75))
        .with_time_gaps("TimeGap", TimeUnit::Day)
        .with_records_keep(3)
        .with_drop_rank_column(false)
}

fn row_values(table: &Table, row: usize) -> Vec<Value> {
    table
        .column_names()
        .iter()
        .map(|name| table.value(row, name).unwrap())
        .collect()
}

fn find_row(table: &Table, store: &str, rank: f64) -> Option<usize> {
    (0..table.num_rows()).find(|&row| {
        table.value(row, "store").unwrap() == Value::from(store)
            && table.value(row, "rank").unwrap() == Value::Number(rank)
    })
}

// ========== Consistency Tests ==========

#[test]
fn test_scoring_matches_full_history() {
    let input = panel();
    for spec in [spec(), spec().with_simple_impute(false)] {
        let engine = FeatureEngine::new(spec).unwrap();
        let scored = engine.score(&input).unwrap();
        let history = engine.full_history(&input).unwrap();

        assert_eq!(scored.column_names(), history.column_names());
        assert_eq!(history.num_rows(), input.num_rows());
        // 3 + 2 + 3 kept rows
        assert_eq!(scored.num_rows(), 8);

        for row in 0..scored.num_rows() {
            let store = scored.value(row, "store").unwrap();
            let rank = scored.value(row, "rank").unwrap().as_f64().unwrap();
            let matching = find_row(&history, store.as_str().unwrap(), rank).unwrap();
            assert_eq!(
                row_values(&scored, row),
                row_values(&history, matching),
                "store {} rank {}",
                store,
                rank
            );
        }
    }
}

#[test]
fn test_scoring_rows_ordered_by_entity_then_rank() {
    let scored = FeatureEngine::new(spec()).unwrap().score(&panel()).unwrap();
    let keys: Vec<(String, f64)> = (0..scored.num_rows())
        .map(|row| {
            (
                scored.value(row, "store").unwrap().to_string(),
                scored.value(row, "rank").unwrap().as_f64().unwrap(),
            )
        })
        .collect();

    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    assert_eq!(keys, sorted);
    assert_eq!(keys[0], ("east".to_string(), 1.0));
}

#[test]
fn test_schema_invariant_under_records_keep_and_entities() {
    let input = panel();
    let north_only = input.take(&(0..7).collect::<Vec<_>>());
    let expected = FeatureEngine::new(spec())
        .unwrap()
        .score(&input)
        .unwrap()
        .column_names()
        .to_vec();

    for records_keep in [1, 2, 5] {
        let engine = FeatureEngine::new(spec().with_records_keep(records_keep)).unwrap();
        assert_eq!(engine.score(&input).unwrap().column_names(), expected.as_slice());
        assert_eq!(engine.score(&north_only).unwrap().column_names(), expected.as_slice());
    }

    let engine = FeatureEngine::new(spec()).unwrap();
    let schema = engine.output_schema(input.column_names()).unwrap();
    assert_eq!(schema.column_names(), expected);
    assert_eq!(schema.num_columns(), expected.len());
}

#[test]
fn test_no_missing_cells_after_imputation() {
    let scored = FeatureEngine::new(spec()).unwrap().score(&panel()).unwrap();
    for (name, column) in scored.columns() {
        assert_eq!(column.null_count(), 0, "column {}", name);
    }
}

// ========== Feature Semantics Tests ==========

#[test]
fn test_time_gap_channel_one_is_date_difference() {
    let input = panel();
    let engine = FeatureEngine::new(spec().with_simple_impute(false)).unwrap();
    let history = engine.full_history(&input).unwrap();

    for row in 0..history.num_rows() {
        let store = history.value(row, "store").unwrap();
        let rank = history.value(row, "rank").unwrap().as_f64().unwrap();
        let day = history.value(row, "day").unwrap().as_f64().unwrap();
        let gap = history.value(row, "store_TimeGap_1").unwrap();

        let earlier = find_row(&history, store.as_str().unwrap(), rank + 1.0);
        match earlier {
            Some(earlier) => {
                let earlier_day = history.value(earlier, "day").unwrap().as_f64().unwrap();
                assert_eq!(gap, Value::Number(day - earlier_day));
            }
            None => assert!(gap.is_null()),
        }
    }
}

#[test]
fn test_rolling_mean_matches_lags() {
    // With lags covering the widest period, MA_3 is the mean of LAG_1..LAG_3
    let spec = FeatureSpec::new(["returns"], "day")
        .with_grouping_vars(["store"])
        .with_lags([1, 2, 3])
        .with_periods([3])
        .with_stat("MA", StatFunction::Mean)
        .with_simple_impute(false);
    let history = FeatureEngine::new(spec).unwrap().full_history(&panel()).unwrap();

    for row in 0..history.num_rows() {
        let lags: Vec<f64> = (1..=3)
            .filter_map(|lag| {
                history
                    .value(row, &format!("store_LAG_{}_returns", lag))
                    .unwrap()
                    .as_f64()
            })
            .collect();
        let mean = history.value(row, "store_MA_3_returns").unwrap();
        if lags.is_empty() {
            assert!(mean.is_null());
        } else {
            let expected = lags.iter().sum::<f64>() / lags.len() as f64;
            let actual = mean.as_f64().unwrap();
            assert!((actual - expected).abs() < 1e-12, "row {}: {} vs {}", row, actual, expected);
        }
    }
}

#[test]
fn test_lead_matches_lag_on_negated_sort_column() {
    let input = panel();
    let mut negated = input.clone();
    if let Column::Number(days) = negated.column_mut("day").unwrap() {
        for day in days.iter_mut().flatten() {
            *day = -*day;
        }
    }

    let base = FeatureSpec::new(["sales"], "day")
        .with_grouping_vars(["store"])
        .with_lags([1, 2])
        .with_periods([2])
        .with_stat("MA", StatFunction::Mean);
    let lead = FeatureEngine::new(base.clone().with_direction(Direction::Lead))
        .unwrap()
        .full_history(&input)
        .unwrap();
    let lag = FeatureEngine::new(base).unwrap().full_history(&negated).unwrap();

    assert_eq!(lead.column_names(), lag.column_names());
    assert_eq!(lead.num_rows(), lag.num_rows());
    for name in ["sales", "store_LAG_1_sales", "store_LAG_2_sales", "store_MA_2_sales"] {
        assert_eq!(lead.numbers(name).unwrap(), lag.numbers(name).unwrap(), "{}", name);
    }
}

#[test]
fn test_planned_depth_covers_every_window() {
    let plan = WindowPlanner::plan(&spec());
    // Baseline: three lag columns, windows and gap channels reach three rows back
    assert_eq!(plan.max_cols, 3);
    assert_eq!(plan.history_depth, 3);
    assert_eq!(plan.gap_channels, 3);
}
