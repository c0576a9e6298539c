//! Basic usage example for panelscore-core
//!
//! Run with: cargo run --example basic_usage

use panelscore_core::{
    Column, ColumnNamer, FeatureColumn, FeatureSpec, StatFunction, Table, TimeUnit, Value,
};

fn main() {
    println!("=== panelscore Core Basic Usage Example ===\n");

    // Example 1: Building a panel table
    println!("1. Building a Table:");
    let table = Table::new()
        .with_column("store", Column::from_strs(&["s1", "s1", "s2"]))
        .and_then(|t| t.with_column("day", Column::from_f64s(&[1.0, 2.0, 1.0])))
        .and_then(|t| t.with_column("sales", Column::Number(vec![Some(10.0), None, Some(7.5)])));
    let table = match table {
        Ok(table) => table,
        Err(e) => {
            eprintln!("   Failed to build table: {}", e);
            return;
        }
    };
    println!("   Columns: {:?}", table.column_names());
    println!("   Rows: {}", table.num_rows());
    println!("   sales[1]: {}\n", table.value(1, "sales").unwrap_or(Value::Null));

    // Example 2: Describing features
    println!("2. Creating a Feature Spec:");
    let spec = FeatureSpec::new(["sales"], "day")
        .with_grouping_vars(["store"])
        .with_lags([1, 2])
        .with_periods([3])
        .with_stat("MA", StatFunction::Mean)
        .with_stat("P90", StatFunction::Quantile(90))
        .with_time_gaps("TimeGap", TimeUnit::Day);
    println!("   Effective lags: {:?}", spec.effective_lags());
    println!("   Group prefix: {:?}\n", spec.group_prefix());

    // Example 3: Validating the spec
    println!("3. Validating:");
    match spec.validate() {
        Ok(()) => println!("   Spec is valid\n"),
        Err(e) => println!("   Spec is invalid: {}\n", e),
    }
    let broken = spec.clone().with_records_keep(0);
    if let Err(e) = broken.validate() {
        println!("   records_keep = 0 -> {}\n", e);
    }

    // Example 4: Naming derived columns
    println!("4. Naming Derived Columns:");
    let prefix = spec.group_prefix();
    let mut namer = ColumnNamer::with_reserved(table.column_names().iter().cloned());
    let columns = [
        FeatureColumn::lag(prefix.as_deref(), 1, "sales"),
        FeatureColumn::time_gap(prefix.as_deref(), 1, "TimeGap"),
        FeatureColumn::rolling(prefix.as_deref(), "MA", 3, "sales"),
    ];
    for column in &columns {
        match namer.claim(column) {
            Ok(name) => println!("   {}", name),
            Err(e) => println!("   {}", e),
        }
    }

    println!("\n=== Example Complete ===");
}
