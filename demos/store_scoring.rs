//! Store scoring example
//!
//! This example demonstrates:
//! - Loading a feature spec from a YAML file
//! - Scoring the latest visit of every store
//! - Reading the run metrics
//!
//! Run with: RUST_LOG=panelscore_runtime=debug cargo run --example store_scoring

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use panelscore_sdk::{Column, ScoringEngineBuilder, Table};
use tracing_subscriber::EnvFilter;

/// Irregular daily visits for three stores, ranked from the latest visit
fn store_panel() -> Result<Table> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("invalid start date"))?;

    let mut stores = Vec::new();
    let mut dates = Vec::new();
    let mut sales = Vec::new();
    let mut footfall = Vec::new();
    let mut ranks = Vec::new();
    for (store, visits, base) in [("downtown", 12, 120.0), ("airport", 9, 300.0), ("mall", 4, 80.0)] {
        for visit in 0..visits {
            stores.push(store);
            dates.push(start + Duration::days(visit * 2 + visit % 3));
            sales.push(base + (visit as f64 * 7.0) % 23.0);
            footfall.push(base / 4.0 + (visit as f64 * 3.0) % 11.0);
            ranks.push((visits - visit) as f64);
        }
    }

    Ok(Table::new()
        .with_column("store", Column::from_strs(&stores))?
        .with_column("date", Column::from_timestamps(&dates))?
        .with_column("sales", Column::from_f64s(&sales))?
        .with_column("footfall", Column::from_f64s(&footfall))?
        .with_column("rank", Column::from_f64s(&ranks))?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "panelscore_runtime=debug".into()),
        )
        .init();

    println!("=== Store Scoring Example ===\n");

    let engine = ScoringEngineBuilder::new()
        .with_spec_file("demos/specs/store_features.yaml")
        .enable_progress(true)
        .build()?;

    let plan = engine.plan();
    println!("Window plan:");
    println!("  max_cols: {}", plan.max_cols);
    println!("  history_depth: {}", plan.history_depth);
    println!("  lags: {:?}", plan.effective_lags);
    println!("  periods: {:?}\n", plan.periods);

    let panel = store_panel()?;
    let output = engine.score_with_metrics(&panel)?;
    let table = &output.table;

    println!("Scored {} rows x {} columns:", table.num_rows(), table.num_columns());
    for row in 0..table.num_rows() {
        println!("\n  store {}:", table.value(row, "store")?);
        for name in table.column_names() {
            println!("    {:<28} {}", name, table.value(row, name)?);
        }
    }

    let metrics = &output.metrics;
    println!("\nMetrics:");
    println!("  Rows in: {}", metrics.rows_in.get());
    println!("  Rows out: {}", metrics.rows_out.get());
    println!("  Entities: {}", metrics.entities.get());
    println!("  Imputed cells: {}", metrics.imputed_cells.get());
    println!("  Avg entity time: {:.6}s", metrics.entity_seconds.avg());

    Ok(())
}
