//! Output assembly
//!
//! Merges the family frames of every entity on their row keys, then
//! sanitizes, coerces, imputes and orders the result into the final table.

use crate::error::{Result, RuntimeError};
use crate::frame::{EntityFrames, FeatureFrame};
use crate::observability::RunMetrics;
use crate::schema::{OutputSchema, SchemaColumn};
use panelscore_core::{CategoricalColumn, Column, FeatureSpec, Table};
use std::collections::{BTreeSet, HashMap};

/// Imputed value of missing numeric cells
pub const NUMERIC_FILL: f64 = -1.0;

/// Imputed level of missing categorical cells
pub const CATEGORICAL_FILL: &str = "0";

/// How family frames of one entity are joined on row keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// Only rows present in every frame
    Inner,
    /// Rows present in any frame; absent cells are missing
    Outer,
}

/// One output row: the source row and the row index within each family frame
struct MergedRow {
    source: Option<usize>,
    lags: Option<usize>,
    time_gaps: Option<usize>,
    rolling: Option<usize>,
}

/// Builds the output table from per-entity frames
pub struct OutputAssembler<'a> {
    spec: &'a FeatureSpec,
}

impl<'a> OutputAssembler<'a> {
    pub fn new(spec: &'a FeatureSpec) -> Self {
        Self { spec }
    }

    /// Outer when time gaps are enabled, inner otherwise
    pub fn merge_kind(&self) -> MergeKind {
        if self.spec.time_gaps_enabled() {
            MergeKind::Outer
        } else {
            MergeKind::Inner
        }
    }

    pub fn assemble(
        &self,
        input: &Table,
        mut entities: Vec<EntityFrames>,
        schema: &OutputSchema,
        metrics: &RunMetrics,
    ) -> Result<Table> {
        entities.sort_by(|a, b| a.entity.cmp(&b.entity));

        let mut source_rows = Vec::new();
        let mut lag_values = vec![Vec::new(); schema.lags.len()];
        let mut gap_values = vec![Vec::new(); schema.time_gaps.len()];
        let mut rolling_values = vec![Vec::new(); schema.rolling.len()];

        for frames in &entities {
            let rows = self.merge_entity(frames);
            source_rows.extend(rows.iter().map(|r| r.source));

            gather(&frames.lags, &rows, |r| r.lags, &schema.lags, &mut lag_values)?;
            if let Some(gaps) = &frames.time_gaps {
                gather(gaps, &rows, |r| r.time_gaps, &schema.time_gaps, &mut gap_values)?;
            }
            gather(&frames.rolling, &rows, |r| r.rolling, &schema.rolling, &mut rolling_values)?;
        }

        let mut table = input.take_opt(&source_rows);
        let derived = schema
            .lags
            .iter()
            .zip(lag_values)
            .chain(schema.time_gaps.iter().zip(gap_values))
            .chain(schema.rolling.iter().zip(rolling_values));
        for (column, values) in derived {
            table.push_column(column.name.clone(), Column::Number(values))?;
        }

        sanitize_numbers(&mut table);
        coerce_text(&mut table);
        if self.spec.drop_rank_column && table.contains(&self.spec.rank_column) {
            table.drop_column(&self.spec.rank_column)?;
        }
        if self.spec.simple_impute {
            let filled = impute(&mut table);
            metrics.imputed_cells.add(filled as u64);
            tracing::debug!("Imputed {} missing cells", filled);
        }

        let expected = schema.column_names();
        if table.column_names() != expected.as_slice() {
            return Err(RuntimeError::InternalError(format!(
                "assembled columns {:?} do not match the output schema {:?}",
                table.column_names(),
                expected
            )));
        }

        Ok(table)
    }

    /// Join base rows and family frames of one entity on row keys, ordered by key
    fn merge_entity(&self, frames: &EntityFrames) -> Vec<MergedRow> {
        let base: HashMap<u64, usize> = frames.base.iter().copied().collect();
        let lags = key_index(&frames.lags);
        let time_gaps = frames.time_gaps.as_ref().map(key_index);
        let rolling = key_index(&frames.rolling);

        let mut keys: BTreeSet<u64> = base.keys().copied().collect();
        for family in frames.families() {
            let family_keys: BTreeSet<u64> = family.keys().iter().copied().collect();
            keys = match self.merge_kind() {
                MergeKind::Inner => keys.intersection(&family_keys).copied().collect(),
                MergeKind::Outer => keys.union(&family_keys).copied().collect(),
            };
        }

        keys.into_iter()
            .map(|key| MergedRow {
                source: base.get(&key).copied(),
                lags: lags.get(&key).copied(),
                time_gaps: time_gaps.as_ref().and_then(|index| index.get(&key).copied()),
                rolling: rolling.get(&key).copied(),
            })
            .collect()
    }
}

fn key_index(frame: &FeatureFrame) -> HashMap<u64, usize> {
    frame.keys().iter().enumerate().map(|(i, &k)| (k, i)).collect()
}

/// Append the values of every schema column of one family, row by row
fn gather(
    frame: &FeatureFrame,
    rows: &[MergedRow],
    frame_row: impl Fn(&MergedRow) -> Option<usize>,
    columns: &[SchemaColumn],
    out: &mut [Vec<Option<f64>>],
) -> Result<()> {
    for (column, out) in columns.iter().zip(out.iter_mut()) {
        let values = frame.column(&column.name).ok_or_else(|| {
            RuntimeError::InternalError(format!("feature column '{}' was not computed", column.name))
        })?;
        out.extend(rows.iter().map(|row| frame_row(row).and_then(|i| values[i])));
    }
    Ok(())
}

/// Infinite and NaN numbers become missing
fn sanitize_numbers(table: &mut Table) {
    for (_, column) in table.columns_mut() {
        if let Column::Number(values) = column {
            for value in values.iter_mut() {
                if matches!(value, Some(v) if !v.is_finite()) {
                    *value = None;
                }
            }
        }
    }
}

/// Free-text columns become categorical
fn coerce_text(table: &mut Table) {
    for (_, column) in table.columns_mut() {
        if let Column::Text(values) = column {
            let categorical = CategoricalColumn::from_strings(values.drain(..));
            *column = Column::Categorical(categorical);
        }
    }
}

/// Fill missing numeric cells with -1 and missing categorical cells with "0".
/// Returns the number of filled cells.
fn impute(table: &mut Table) -> usize {
    let mut filled = 0;
    for (_, column) in table.columns_mut() {
        match column {
            Column::Number(values) => {
                for value in values.iter_mut().filter(|v| v.is_none()) {
                    *value = Some(NUMERIC_FILL);
                    filled += 1;
                }
            }
            Column::Categorical(categorical) => {
                filled += categorical.fill_missing(CATEGORICAL_FILL);
            }
            _ => {}
        }
    }
    filled
}
