//! Per-entity result frames
//!
//! Every feature engine turns one [`EntityWindow`](crate::partition::EntityWindow)
//! into an owned [`FeatureFrame`]: numeric columns over row keys. Frames of
//! one entity are merged on those keys by the output assembler.

use crate::error::{Result, RuntimeError};
use panelscore_core::EntityKey;

/// Numeric feature columns of one family for one entity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    keys: Vec<u64>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl FeatureFrame {
    /// Empty frame over the given row keys
    pub fn new(keys: Vec<u64>) -> Self {
        Self {
            keys,
            columns: Vec::new(),
        }
    }

    /// Append a column; it must have one value per row key
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.keys.len() {
            return Err(RuntimeError::InternalError(format!(
                "feature column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.keys.len()
            )));
        }
        self.columns.push((name, values));
        Ok(())
    }

    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn num_rows(&self) -> usize {
        self.keys.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// All family frames of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFrames {
    pub entity: EntityKey,
    /// `(row key, source row)` of every kept row
    pub base: Vec<(u64, usize)>,
    pub lags: FeatureFrame,
    /// Present iff time gaps are enabled
    pub time_gaps: Option<FeatureFrame>,
    pub rolling: FeatureFrame,
}

impl EntityFrames {
    /// Family frames in output column order
    pub fn families(&self) -> Vec<&FeatureFrame> {
        let mut families = vec![&self.lags];
        if let Some(gaps) = &self.time_gaps {
            families.push(gaps);
        }
        families.push(&self.rolling);
        families
    }
}
