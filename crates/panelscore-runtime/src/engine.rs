//! Feature engine
//!
//! Orchestrates one run: precondition checks, schema, partitioning, the lag,
//! time-gap and rolling engines per entity, and output assembly.

use crate::assembler::OutputAssembler;
use crate::error::{Result, RuntimeError};
use crate::frame::EntityFrames;
use crate::lag::LagEngine;
use crate::observability::{ProgressTracker, RunMetrics};
use crate::partition::{GroupPartitioner, Selection};
use crate::planner::{WindowPlan, WindowPlanner};
use crate::rolling::RollingStatEngine;
use crate::schema::{rolling_targets, OutputSchema};
use crate::time_gap::{sort_timestamps, TimeGapEngine};
use panelscore_core::{ColumnKind, FeatureSpec, Table};
use std::time::Instant;

/// Output table of a run together with its metrics
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: Table,
    pub metrics: RunMetrics,
}

/// Derives lag, time-gap and rolling features for a validated feature spec
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    spec: FeatureSpec,
    plan: WindowPlan,
    progress: bool,
}

impl FeatureEngine {
    /// Validate the spec and plan its windows
    pub fn new(spec: FeatureSpec) -> Result<Self> {
        spec.validate()?;
        let plan = WindowPlanner::plan(&spec);
        tracing::debug!(
            "Planned windows: max_cols={}, history_depth={}, lags={:?}, periods={:?}, gap_channels={}",
            plan.max_cols,
            plan.history_depth,
            plan.effective_lags,
            plan.periods,
            plan.gap_channels
        );

        Ok(Self {
            spec,
            plan,
            progress: false,
        })
    }

    /// Log progress at debug level while computing
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    /// Output columns for a table with the given input columns
    pub fn output_schema(&self, input_columns: &[String]) -> Result<OutputSchema> {
        OutputSchema::build(&self.spec, &self.plan, input_columns)
    }

    /// Features for the `records_keep` most recent rows of every entity
    pub fn score(&self, input: &Table) -> Result<Table> {
        Ok(self.run(input, self.scoring())?.table)
    }

    /// Features for every row of every entity
    pub fn full_history(&self, input: &Table) -> Result<Table> {
        Ok(self.run(input, Selection::FullHistory)?.table)
    }

    /// Scoring run that also returns its metrics
    pub fn score_with_metrics(&self, input: &Table) -> Result<RunOutput> {
        self.run(input, self.scoring())
    }

    fn scoring(&self) -> Selection {
        Selection::Scoring {
            records_keep: self.spec.records_keep,
        }
    }

    /// Execute one run
    pub fn run(&self, input: &Table, selection: Selection) -> Result<RunOutput> {
        let started = Instant::now();
        self.check_preconditions(input)?;

        let metrics = RunMetrics::new();
        metrics.rows_in.add(input.num_rows() as u64);

        let schema = self.output_schema(input.column_names())?;
        let windows = GroupPartitioner::new(&self.spec, &self.plan).partition(input, selection)?;
        metrics.entities.add(windows.len() as u64);

        let timestamps = if self.spec.time_gaps_enabled() {
            Some(sort_timestamps(input, &self.spec)?)
        } else {
            None
        };
        let lag_engine = LagEngine::new(&schema);
        let gap_engine = TimeGapEngine::new(&self.spec, &schema);
        let rolling_engine = RollingStatEngine::new(&self.spec, &self.plan, &schema);

        let rolling_target_count = rolling_targets(&self.spec).len();
        let units_per_entity =
            (rolling_target_count * (self.plan.periods.len() + self.plan.max_cols)) as u64;
        let mut progress = ProgressTracker::new(
            self.plan.work_units(windows.len(), rolling_target_count),
            self.progress,
        );

        let mut frames = Vec::with_capacity(windows.len());
        for window in &windows {
            let entity_started = Instant::now();
            if window.kept.is_empty() {
                metrics.empty_entities.inc();
                tracing::warn!(
                    "Entity {} has no rows to emit ({} rows of history)",
                    window.key,
                    window.total_rows
                );
            }

            let (time_gaps, gap_series) = match timestamps {
                Some(timestamps) => (
                    Some(gap_engine.compute(timestamps, window)?),
                    Some(gap_engine.gap_series(timestamps, window)),
                ),
                None => (None, None),
            };

            frames.push(EntityFrames {
                entity: window.key.clone(),
                base: window
                    .kept
                    .iter()
                    .map(|kept| (kept.key, window.rows[kept.slot]))
                    .collect(),
                lags: lag_engine.compute(input, window)?,
                time_gaps,
                rolling: rolling_engine.compute(input, window, gap_series.as_deref())?,
            });

            metrics.entity_seconds.observe_duration(entity_started.elapsed());
            progress.advance(units_per_entity);
        }

        let table = OutputAssembler::new(&self.spec).assemble(input, frames, &schema, &metrics)?;
        metrics.rows_out.add(table.num_rows() as u64);

        tracing::info!(
            "Feature run ({}): {} entities, {} rows in, {} rows out, {} columns, max_cols={}, {:.3}s",
            match selection {
                Selection::Scoring { .. } => "scoring",
                Selection::FullHistory => "full history",
            },
            windows.len(),
            input.num_rows(),
            table.num_rows(),
            table.num_columns(),
            self.plan.max_cols,
            started.elapsed().as_secs_f64()
        );
        tracing::debug!(
            "Entity compute time: avg {:.6}s, max {:.6}s",
            metrics.entity_seconds.avg(),
            metrics.entity_seconds.max()
        );

        Ok(RunOutput { table, metrics })
    }

    /// Required columns exist with the expected types
    fn check_preconditions(&self, input: &Table) -> Result<()> {
        let required = std::iter::once(&self.spec.sort_column)
            .chain(&self.spec.grouping_vars)
            .chain(&self.spec.targets);
        for name in required {
            if !input.contains(name) {
                return Err(RuntimeError::PreconditionError(format!(
                    "column '{}' is missing from the input table",
                    name
                )));
            }
        }

        for target in &self.spec.targets {
            let kind = input.column(target)?.kind();
            if kind != ColumnKind::Number {
                return Err(RuntimeError::PreconditionError(format!(
                    "target '{}' is {}, expected number",
                    target,
                    kind.type_name()
                )));
            }
        }

        if self.spec.time_gaps_enabled() {
            sort_timestamps(input, &self.spec)?;
        }
        Ok(())
    }
}
