//! Columnar table with owned buffers
//!
//! `Table` is the panel representation used throughout the engine. Derived
//! features are added with [`Table::push_column`]; nothing in the engine
//! mutates a caller's table in place.

use super::column::Column;
use super::value::Value;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered collection of named, equally long columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    num_rows: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Table::push_column`]
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(CoreError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.num_rows {
            return Err(CoreError::LengthMismatch {
                column: name,
                expected: self.num_rows,
                actual: column.len(),
            });
        }

        if self.columns.is_empty() {
            self.num_rows = column.len();
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column and return it
    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let pos = self
            .position(name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.to_string()))?;

        self.names.remove(pos);
        let column = self.columns.remove(pos);
        self.rebuild_index();
        if self.columns.is_empty() {
            self.num_rows = 0;
        }
        Ok(column)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|pos| &self.columns[pos])
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get_column(name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.to_string()))
    }

    /// Mutable access to a column. The caller must keep its length unchanged.
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        match self.position(name) {
            Some(pos) => Ok(&mut self.columns[pos]),
            None => Err(CoreError::ColumnNotFound(name.to_string())),
        }
    }

    /// Numeric buffer of a column, or a type error
    pub fn numbers(&self, name: &str) -> Result<&[Option<f64>]> {
        let column = self.column(name)?;
        column.as_numbers().ok_or_else(|| {
            CoreError::TypeError(format!(
                "column '{}' is {}, expected number",
                name,
                column.kind().type_name()
            ))
        })
    }

    /// Cell value by row and column name
    pub fn value(&self, row: usize, name: &str) -> Result<Value> {
        Ok(self.column(name)?.value(row))
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(name, column)` pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter())
    }

    /// Mutable iteration over `(name, column)` pairs in column order
    pub fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut Column)> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter_mut())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Copy a row subset (in the given order) into a new table
    pub fn take(&self, rows: &[usize]) -> Table {
        let rows: Vec<Option<usize>> = rows.iter().copied().map(Some).collect();
        self.take_opt(&rows)
    }

    /// Copy a row subset into a new table; `None` entries become all-missing rows
    pub fn take_opt(&self, rows: &[Option<usize>]) -> Table {
        let mut table = Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take_opt(rows)).collect(),
            index: HashMap::new(),
            num_rows: rows.len(),
        };
        table.rebuild_index();
        table
    }

    fn position(&self, name: &str) -> Option<usize> {
        // Deserialized tables carry no index yet
        if self.index.len() != self.names.len() {
            return self.names.iter().position(|n| n == name);
        }
        self.index.get(name).copied()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows && self.names == other.names && self.columns == other.columns
    }
}
