//! Deterministic feature column naming
//!
//! Every derived column name is produced by [`FeatureColumn::name`] from a
//! structured `(prefix?, role, index, target)` tuple, so scoring-time and
//! training-time outputs can never drift apart by string formatting.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Feature family of a derived column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Shifted target value
    Lag,
    /// Inter-event time difference channel
    TimeGap,
    /// Windowed aggregate; `stat` is the user-facing stat name
    Rolling { stat: String },
}

/// Structured description of one derived column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureColumn {
    /// Grouping prefix, absent for ungrouped tables
    pub prefix: Option<String>,
    pub role: ColumnRole,
    /// Lag depth, time-gap channel or rolling period
    pub index: usize,
    /// Source target (or the time-gap family name)
    pub target: String,
}

impl FeatureColumn {
    pub fn lag(prefix: Option<&str>, lag: usize, target: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            role: ColumnRole::Lag,
            index: lag,
            target: target.to_string(),
        }
    }

    pub fn time_gap(prefix: Option<&str>, channel: usize, gap_name: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            role: ColumnRole::TimeGap,
            index: channel,
            target: gap_name.to_string(),
        }
    }

    pub fn rolling(prefix: Option<&str>, stat: &str, period: usize, target: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            role: ColumnRole::Rolling {
                stat: stat.to_string(),
            },
            index: period,
            target: target.to_string(),
        }
    }

    /// Rendered column name
    ///
    /// - lag: `{prefix_}LAG_{index}_{target}`
    /// - time gap: `{prefix_}{target}_{index}`
    /// - rolling: `{prefix_}{stat}_{index}_{target}`
    pub fn name(&self) -> String {
        let stem = match &self.role {
            ColumnRole::Lag => format!("LAG_{}_{}", self.index, self.target),
            ColumnRole::TimeGap => format!("{}_{}", self.target, self.index),
            ColumnRole::Rolling { stat } => format!("{}_{}_{}", stat, self.index, self.target),
        };
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, stem),
            None => stem,
        }
    }
}

/// Name registry that rejects collisions
#[derive(Debug, Default)]
pub struct ColumnNamer {
    taken: HashSet<String>,
}

impl ColumnNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a set of names that are already in use (input columns)
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Render and claim the name of a feature column
    pub fn claim(&mut self, column: &FeatureColumn) -> Result<String> {
        let name = column.name();
        if !self.taken.insert(name.clone()) {
            return Err(CoreError::ConfigError(format!(
                "derived column name '{}' collides with an existing column",
                name
            )));
        }
        Ok(name)
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}
