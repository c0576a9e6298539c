//! Rolling statistic engine
//!
//! For every `(target, stat, period)` in the output schema, aggregates the
//! trailing window of each kept row directly over the entity's positional
//! series. Missing slots are skipped; an all-missing window is missing.

pub mod aggregate;

pub use aggregate::aggregate;

use crate::error::{Result, RuntimeError};
use crate::frame::FeatureFrame;
use crate::partition::EntityWindow;
use crate::planner::WindowPlan;
use crate::schema::OutputSchema;
use panelscore_core::{ColumnRole, FeatureSpec, StatFunction, Table};
use std::collections::HashMap;

/// Computes the rolling family of one entity
pub struct RollingStatEngine<'a> {
    spec: &'a FeatureSpec,
    plan: &'a WindowPlan,
    schema: &'a OutputSchema,
}

impl<'a> RollingStatEngine<'a> {
    pub fn new(spec: &'a FeatureSpec, plan: &'a WindowPlan, schema: &'a OutputSchema) -> Self {
        Self { spec, plan, schema }
    }

    /// One column per rolling schema entry, one row per kept row.
    /// `gap_series` is the time-gap channel 1 series by working slot, present
    /// iff time gaps are enabled.
    pub fn compute(
        &self,
        table: &Table,
        window: &EntityWindow,
        gap_series: Option<&[Option<f64>]>,
    ) -> Result<FeatureFrame> {
        let mut frame = FeatureFrame::new(window.kept.iter().map(|k| k.key).collect());
        let mut series_cache: HashMap<&str, Vec<Option<f64>>> = HashMap::new();

        for column in &self.schema.rolling {
            let target = column.column.target.as_str();
            if !series_cache.contains_key(target) {
                let series = self.slot_series(table, window, target, gap_series)?;
                series_cache.insert(target, series);
            }
            let series = &series_cache[target];
            let function = self.stat_function(&column.column.role)?;
            let period = column.column.index;
            let slots = if self.is_gap_target(target) {
                self.plan.gap_window_slots(period)
            } else {
                self.plan.window_slots(period)
            };

            let values = window
                .kept
                .iter()
                .map(|kept| {
                    let window_values: Vec<f64> = slots
                        .clone()
                        .filter_map(|offset| window.shifted_slot(kept.slot, offset))
                        .filter_map(|slot| series[slot])
                        .filter(|v| v.is_finite())
                        .collect();
                    aggregate(function, &window_values)
                })
                .collect();
            frame.push_column(column.name.clone(), values)?;
        }

        Ok(frame)
    }

    /// Values of a rolled series for every working slot
    fn slot_series(
        &self,
        table: &Table,
        window: &EntityWindow,
        target: &str,
        gap_series: Option<&[Option<f64>]>,
    ) -> Result<Vec<Option<f64>>> {
        if self.is_gap_target(target) {
            return gap_series.map(<[Option<f64>]>::to_vec).ok_or_else(|| {
                RuntimeError::InternalError(format!("time-gap series '{}' was not computed", target))
            });
        }
        let values = table.numbers(target)?;
        Ok(window.rows.iter().map(|&row| values[row]).collect())
    }

    fn is_gap_target(&self, target: &str) -> bool {
        self.spec.time_gap_name.as_deref() == Some(target)
    }

    fn stat_function(&self, role: &ColumnRole) -> Result<StatFunction> {
        let name = match role {
            ColumnRole::Rolling { stat } => stat,
            other => {
                return Err(RuntimeError::InternalError(format!(
                    "{:?} column in the rolling family",
                    other
                )))
            }
        };
        self.spec
            .stats
            .iter()
            .find(|s| &s.name == name)
            .map(|s| s.function)
            .ok_or_else(|| RuntimeError::InternalError(format!("stat '{}' is not configured", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{GroupPartitioner, Selection};
    use crate::planner::WindowPlanner;
    use panelscore_core::{Column, TimeUnit, WindowingLag};

    fn table() -> Table {
        Table::new()
            .with_column("t", Column::from_f64s(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap()
            .with_column("x", Column::Number(vec![Some(2.0), None, Some(6.0), Some(8.0)]))
            .unwrap()
            .with_column("rank", Column::from_f64s(&[4.0, 3.0, 2.0, 1.0]))
            .unwrap()
    }

    fn run(spec: &FeatureSpec, records_keep: usize) -> FeatureFrame {
        let table = table();
        let plan = WindowPlanner::plan(spec);
        let schema = OutputSchema::build(spec, &plan, table.column_names()).unwrap();
        let windows = GroupPartitioner::new(spec, &plan)
            .partition(&table, Selection::Scoring { records_keep })
            .unwrap();
        RollingStatEngine::new(spec, &plan, &schema)
            .compute(&table, &windows[0], None)
            .unwrap()
    }

    #[test]
    fn test_baseline_window_skips_missing_slots() {
        let spec = FeatureSpec::new(["x"], "t")
            .with_periods([3])
            .with_stat("MA", StatFunction::Mean)
            .with_stat("N", StatFunction::Count);
        let frame = run(&spec, 1);

        // window of rank 1: previous three values 6, missing, 2
        assert_eq!(frame.column("MA_3_x").unwrap(), &[Some(4.0)]);
        assert_eq!(frame.column("N_3_x").unwrap(), &[Some(2.0)]);
    }

    #[test]
    fn test_current_setting_window_excludes_own_row() {
        let spec = FeatureSpec::new(["x"], "t")
            .with_periods([2])
            .with_stat("MAX", StatFunction::Max)
            .with_windowing_lag(WindowingLag::Current);
        let frame = run(&spec, 2);

        // kept in sorted order: rank 2 (x=6), rank 1 (x=8); windows are the
        // two previous slots, never the row's own value
        assert_eq!(frame.keys(), &[2, 1]);
        assert_eq!(frame.column("MAX_2_x").unwrap(), &[Some(2.0), Some(6.0)]);
    }

    #[test]
    fn test_gap_series_window_starts_at_channel_one() {
        let spec = FeatureSpec::new(["x"], "t")
            .with_periods([2])
            .with_stat("MA", StatFunction::Mean)
            .with_time_gaps("Gap", TimeUnit::Day);
        let table = table();
        let plan = WindowPlanner::plan(&spec);
        let schema = OutputSchema::build(&spec, &plan, table.column_names()).unwrap();
        let windows = GroupPartitioner::new(&spec, &plan)
            .partition(&table, Selection::Scoring { records_keep: 1 })
            .unwrap();
        let by_position = [None, Some(1.0), Some(4.0), Some(6.0)];
        let gaps: Vec<Option<f64>> = windows[0].positions.iter().map(|&p| by_position[p]).collect();
        let frame = RollingStatEngine::new(&spec, &plan, &schema)
            .compute(&table, &windows[0], Some(&gaps))
            .unwrap();

        // channel 1 of rank 1 is 6, channel 2 is 4
        assert_eq!(frame.column("MA_2_Gap").unwrap(), &[Some(5.0)]);
    }

    #[test]
    fn test_all_missing_window_is_missing() {
        let spec = FeatureSpec::new(["x"], "t")
            .with_periods([1])
            .with_stat("SD", StatFunction::Sd)
            .with_stat("MA", StatFunction::Mean);
        let frame = run(&spec, 4);

        // rank 4 has no history, rank 2's previous value is missing
        assert_eq!(frame.column("MA_1_x").unwrap(), &[None, Some(2.0), None, Some(6.0)]);
        assert_eq!(frame.column("SD_1_x").unwrap(), &[None, None, None, None]);
    }
}
