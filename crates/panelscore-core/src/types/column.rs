//! Owned column buffers
//!
//! Every column owns its data. Row subsets are produced by copying
//! (`take`), never by borrowing from the source table.

use super::value::Value;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column kind, used in error messages and for building null columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Text,
    Categorical,
    Timestamp,
}

impl ColumnKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnKind::Number => "number",
            ColumnKind::Text => "text",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Timestamp => "timestamp",
        }
    }
}

/// Categorical column: a level set plus one optional level code per row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoricalColumn {
    levels: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl CategoricalColumn {
    /// Build from raw strings. Levels are the sorted distinct non-missing values.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let raw: Vec<Option<String>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        let levels: Vec<String> = raw
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let codes = raw
            .iter()
            .map(|v| {
                v.as_ref().and_then(|s| {
                    levels
                        .binary_search(s)
                        .ok()
                        .map(|idx| idx as u32)
                })
            })
            .collect();

        Self { levels, codes }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Level of the given row
    pub fn get(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .copied()
            .flatten()
            .and_then(|code| self.levels.get(code as usize))
            .map(|s| s.as_str())
    }

    /// Code of a level, adding the level to the set if it is not present
    pub fn ensure_level(&mut self, level: &str) -> u32 {
        match self.levels.iter().position(|l| l == level) {
            Some(idx) => idx as u32,
            None => {
                self.levels.push(level.to_string());
                (self.levels.len() - 1) as u32
            }
        }
    }

    /// Replace every missing row with `level`. Returns the number of filled rows.
    pub fn fill_missing(&mut self, level: &str) -> usize {
        let missing = self.codes.iter().filter(|c| c.is_none()).count();
        if missing == 0 {
            return 0;
        }
        let code = self.ensure_level(level);
        for slot in self.codes.iter_mut().filter(|c| c.is_none()) {
            *slot = Some(code);
        }
        missing
    }

    fn take_opt(&self, rows: &[Option<usize>]) -> Self {
        Self {
            levels: self.levels.clone(),
            codes: rows
                .iter()
                .map(|row| row.and_then(|r| self.codes.get(r).copied().flatten()))
                .collect(),
        }
    }
}

/// A typed, owned column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Column {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Categorical(CategoricalColumn),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl Column {
    /// Dense numeric column without missing values
    pub fn from_f64s(values: &[f64]) -> Self {
        Column::Number(values.iter().copied().map(Some).collect())
    }

    /// Dense text column without missing values
    pub fn from_strs(values: &[&str]) -> Self {
        Column::Text(values.iter().map(|s| Some(s.to_string())).collect())
    }

    /// Dense timestamp column without missing values
    pub fn from_timestamps(values: &[NaiveDateTime]) -> Self {
        Column::Timestamp(values.iter().copied().map(Some).collect())
    }

    /// All-missing column of the given kind
    pub fn nulls(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Number => Column::Number(vec![None; len]),
            ColumnKind::Text => Column::Text(vec![None; len]),
            ColumnKind::Categorical => Column::Categorical(CategoricalColumn {
                levels: Vec::new(),
                codes: vec![None; len],
            }),
            ColumnKind::Timestamp => Column::Timestamp(vec![None; len]),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Number(_) => ColumnKind::Number,
            Column::Text(_) => ColumnKind::Text,
            Column::Categorical(_) => ColumnKind::Categorical,
            Column::Timestamp(_) => ColumnKind::Timestamp,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Categorical(c) => c.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row` as a `Value` (`Null` when missing or out of range)
    pub fn value(&self, row: usize) -> Value {
        match self {
            Column::Number(v) => v.get(row).copied().flatten().into(),
            Column::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map(Value::String)
                .unwrap_or(Value::Null),
            Column::Categorical(c) => c
                .get(row)
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null),
            Column::Timestamp(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(Value::Timestamp)
                .unwrap_or(Value::Null),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.value(row).is_null()
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Number(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Text(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Categorical(c) => c.codes().iter().filter(|x| x.is_none()).count(),
            Column::Timestamp(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamps(&self) -> Option<&[Option<NaiveDateTime>]> {
        match self {
            Column::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalColumn> {
        match self {
            Column::Categorical(c) => Some(c),
            _ => None,
        }
    }

    /// Copy the given rows into a new column
    pub fn take(&self, rows: &[usize]) -> Self {
        let rows: Vec<Option<usize>> = rows.iter().copied().map(Some).collect();
        self.take_opt(&rows)
    }

    /// Copy the given rows into a new column; `None` rows become missing
    pub fn take_opt(&self, rows: &[Option<usize>]) -> Self {
        fn pick<T: Clone>(data: &[Option<T>], rows: &[Option<usize>]) -> Vec<Option<T>> {
            rows.iter()
                .map(|row| row.and_then(|r| data.get(r).cloned().flatten()))
                .collect()
        }

        match self {
            Column::Number(v) => Column::Number(pick(v, rows)),
            Column::Text(v) => Column::Text(pick(v, rows)),
            Column::Categorical(c) => Column::Categorical(c.take_opt(rows)),
            Column::Timestamp(v) => Column::Timestamp(pick(v, rows)),
        }
    }
}
