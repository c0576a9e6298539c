//! Output schema
//!
//! The ordered list of output columns is a pure function of the feature spec
//! and the input column names. It never depends on row or entity counts.

use crate::error::Result;
use crate::planner::WindowPlan;
use panelscore_core::{ColumnNamer, FeatureColumn, FeatureSpec};
use serde::Serialize;

/// One derived column: its structured description and rendered name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaColumn {
    pub column: FeatureColumn,
    pub name: String,
}

/// Ordered output columns grouped by family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSchema {
    /// Retained input columns, in input order
    pub original: Vec<String>,
    pub lags: Vec<SchemaColumn>,
    pub time_gaps: Vec<SchemaColumn>,
    pub rolling: Vec<SchemaColumn>,
}

impl OutputSchema {
    /// Build the schema for a spec over a table with the given columns.
    /// Fails with a configuration error when a derived name collides with an
    /// input column or another derived column.
    pub fn build(spec: &FeatureSpec, plan: &WindowPlan, input_columns: &[String]) -> Result<Self> {
        let prefix = spec.group_prefix();
        let prefix = prefix.as_deref();
        let mut namer = ColumnNamer::with_reserved(input_columns.iter().cloned());

        let original = input_columns
            .iter()
            .filter(|name| !(spec.drop_rank_column && **name == spec.rank_column))
            .cloned()
            .collect();

        let mut lags = Vec::new();
        for target in &spec.targets {
            for &lag in &plan.effective_lags {
                lags.push(claim(&mut namer, FeatureColumn::lag(prefix, lag, target))?);
            }
        }

        let mut time_gaps = Vec::new();
        if let Some(gap_name) = &spec.time_gap_name {
            for channel in 1..=plan.gap_channels {
                time_gaps.push(claim(
                    &mut namer,
                    FeatureColumn::time_gap(prefix, channel, gap_name),
                )?);
            }
        }

        let mut rolling = Vec::new();
        if spec.has_rolling() {
            for target in rolling_targets(spec) {
                for stat in &spec.stats {
                    for &period in &plan.periods {
                        rolling.push(claim(
                            &mut namer,
                            FeatureColumn::rolling(prefix, &stat.name, period, target),
                        )?);
                    }
                }
            }
        }

        Ok(Self {
            original,
            lags,
            time_gaps,
            rolling,
        })
    }

    /// All output column names in final order
    pub fn column_names(&self) -> Vec<String> {
        let derived = self
            .lags
            .iter()
            .chain(&self.time_gaps)
            .chain(&self.rolling)
            .map(|c| c.name.clone());
        self.original.iter().cloned().chain(derived).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.original.len() + self.lags.len() + self.time_gaps.len() + self.rolling.len()
    }
}

/// Series rolled by the rolling stat engine: every target, then the
/// time-gap channel 1 series under the time-gap family name
pub fn rolling_targets(spec: &FeatureSpec) -> Vec<&str> {
    let mut targets: Vec<&str> = spec.targets.iter().map(String::as_str).collect();
    if let Some(gap_name) = &spec.time_gap_name {
        targets.push(gap_name.as_str());
    }
    targets
}

fn claim(namer: &mut ColumnNamer, column: FeatureColumn) -> Result<SchemaColumn> {
    let name = namer.claim(&column)?;
    Ok(SchemaColumn { column, name })
}
