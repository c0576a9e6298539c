//! Training versus scoring example
//!
//! This example demonstrates:
//! - Building a full-history feature table for model training
//! - Scoring only the latest records with the same spec
//! - Checking that both agree on the scored rows
//!
//! Run with: cargo run --example training_vs_scoring

use anyhow::{bail, Result};
use panelscore_sdk::{Column, ScoringEngineBuilder, Table, Value};
use tracing_subscriber::EnvFilter;

const SPEC: &str = r#"
feature_spec:
  targets: [x]
  sort_column: t
  grouping_vars: [entity]
  lags: [1, 2]
  periods: [2]
  stats:
    - { name: MA, function: mean }
  records_keep: 2
  simple_impute: false
  drop_rank_column: false
"#;

fn panel() -> Result<Table> {
    Ok(Table::new()
        .with_column("entity", Column::from_strs(&["A", "A", "A", "B", "B"]))?
        .with_column("t", Column::from_f64s(&[1.0, 2.0, 3.0, 1.0, 2.0]))?
        .with_column("x", Column::from_f64s(&[10.0, 20.0, 30.0, 5.0, 15.0]))?
        .with_column("rank", Column::from_f64s(&[3.0, 2.0, 1.0, 2.0, 1.0]))?)
}

fn print_table(title: &str, table: &Table) -> Result<()> {
    println!("{}:", title);
    println!("  {}", table.column_names().join("\t"));
    for row in 0..table.num_rows() {
        let cells = table
            .column_names()
            .iter()
            .map(|name| table.value(row, name).map(|v| v.to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        println!("  {}", cells.join("\t"));
    }
    println!();
    Ok(())
}

fn row(table: &Table, index: usize) -> Result<Vec<Value>> {
    Ok(table
        .column_names()
        .iter()
        .map(|name| table.value(index, name))
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "panelscore_runtime=info".into()),
        )
        .init();

    println!("=== Training vs Scoring Example ===\n");

    let engine = ScoringEngineBuilder::new().with_spec_content(SPEC).build()?;
    let input = panel()?;

    let training = engine.full_history(&input)?;
    print_table("Full history (training)", &training)?;

    let scored = engine.score(&input)?;
    print_table("Scoring (latest two records)", &scored)?;

    let mut checked = 0;
    for index in 0..scored.num_rows() {
        let entity = scored.value(index, "entity")?;
        let rank = scored.value(index, "rank")?;
        let matching = (0..training.num_rows()).find(|&i| {
            training.value(i, "entity").ok() == Some(entity.clone())
                && training.value(i, "rank").ok() == Some(rank.clone())
        });
        match matching {
            Some(i) if row(&training, i)? == row(&scored, index)? => checked += 1,
            _ => bail!("scored row for {} rank {} differs from training", entity, rank),
        }
    }
    println!("{} scored rows match their training rows", checked);

    Ok(())
}
