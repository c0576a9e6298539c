//! Group partitioning
//!
//! Splits a panel table into entities, orders each entity's rows by the sort
//! column, picks the kept rows and selects the minimal working set of
//! history rows the feature engines need.

use crate::error::{Result, RuntimeError};
use crate::planner::WindowPlan;
use panelscore_core::{Direction, EntityKey, FeatureSpec, Table};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Which rows of an entity are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Rows whose rank is in `1..=records_keep`, keyed by rank
    Scoring { records_keep: usize },
    /// Every row, keyed by sorted position
    FullHistory,
}

/// A row that appears in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeptRow {
    /// Index into the working set
    pub slot: usize,
    /// Merge key: rank in scoring mode, sorted position in full-history mode
    pub key: u64,
}

/// Working set of one entity, in sorted order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityWindow {
    pub key: EntityKey,
    /// Source table row of each working row
    pub rows: Vec<usize>,
    /// Sorted position of each working row, strictly ascending
    pub positions: Vec<usize>,
    /// Kept rows, in sorted order
    pub kept: Vec<KeptRow>,
    /// Row count of the entity before selection
    pub total_rows: usize,
}

impl EntityWindow {
    /// Source row `lag` sorted positions before working row `slot`, if that
    /// row exists in the working set
    pub fn shifted_row(&self, slot: usize, lag: usize) -> Option<usize> {
        let position = self.positions.get(slot)?.checked_sub(lag)?;
        self.positions
            .binary_search(&position)
            .ok()
            .map(|idx| self.rows[idx])
    }

    /// Working slot `lag` sorted positions before `slot`, if present
    pub fn shifted_slot(&self, slot: usize, lag: usize) -> Option<usize> {
        let position = self.positions.get(slot)?.checked_sub(lag)?;
        self.positions.binary_search(&position).ok()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splits tables into [`EntityWindow`]s
pub struct GroupPartitioner<'a> {
    spec: &'a FeatureSpec,
    plan: &'a WindowPlan,
}

impl<'a> GroupPartitioner<'a> {
    pub fn new(spec: &'a FeatureSpec, plan: &'a WindowPlan) -> Self {
        Self { spec, plan }
    }

    /// Partition the table. Entities come back in ascending key order.
    pub fn partition(&self, table: &Table, selection: Selection) -> Result<Vec<EntityWindow>> {
        let groups = self.group_rows(table)?;
        let sort_column = table.column(&self.spec.sort_column)?;
        let ranks = match selection {
            Selection::Scoring { .. } => Some(self.rank_values(table)?),
            Selection::FullHistory => None,
        };

        let mut windows = Vec::with_capacity(groups.len());
        for (key, mut rows) in groups {
            // Stable ascending sort, missing values first
            rows.sort_by_key(|&row| sort_column.value(row));
            if self.spec.direction == Direction::Lead {
                rows.reverse();
            }

            let kept_positions = match (selection, &ranks) {
                (Selection::Scoring { records_keep }, Some(ranks)) => {
                    kept_by_rank(&key, &rows, ranks, records_keep)?
                }
                _ => (0..rows.len()).map(|pos| (pos, pos as u64)).collect(),
            };

            let window = self.select(key, &rows, &kept_positions);
            tracing::debug!(
                "Entity {}: {} rows, {} kept, {} in working set",
                window.key,
                window.total_rows,
                window.kept.len(),
                window.len()
            );
            windows.push(window);
        }

        Ok(windows)
    }

    /// Source rows per entity key, each list in input order
    fn group_rows(&self, table: &Table) -> Result<BTreeMap<EntityKey, Vec<usize>>> {
        let mut groups: BTreeMap<EntityKey, Vec<usize>> = BTreeMap::new();
        if !self.spec.is_grouped() {
            if table.num_rows() > 0 {
                groups.insert(EntityKey::ungrouped(), (0..table.num_rows()).collect());
            }
            return Ok(groups);
        }

        let columns = self
            .spec
            .grouping_vars
            .iter()
            .map(|name| table.column(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for row in 0..table.num_rows() {
            let key = EntityKey(columns.iter().map(|c| c.value(row)).collect());
            groups.entry(key).or_default().push(row);
        }
        Ok(groups)
    }

    fn rank_values(&self, table: &Table) -> Result<Vec<Option<f64>>> {
        let column = table.get_column(&self.spec.rank_column).ok_or_else(|| {
            RuntimeError::PreconditionError(format!(
                "rank column '{}' is missing from the input table",
                self.spec.rank_column
            ))
        })?;
        let values = column.as_numbers().ok_or_else(|| {
            RuntimeError::TypeError(format!(
                "rank column '{}' is {}, expected number",
                self.spec.rank_column,
                column.kind().type_name()
            ))
        })?;
        Ok(values.to_vec())
    }

    /// Union of the blocks `[p - depth, p]` over all kept positions `p`
    fn select(&self, key: EntityKey, sorted: &[usize], kept: &[(usize, u64)]) -> EntityWindow {
        let depth = self.plan.history_depth;
        let mut positions = BTreeSet::new();
        for &(pos, _) in kept {
            positions.extend(pos.saturating_sub(depth)..=pos);
        }
        let positions: Vec<usize> = positions.into_iter().collect();

        let slot_of: HashMap<usize, usize> = positions
            .iter()
            .enumerate()
            .map(|(slot, &pos)| (pos, slot))
            .collect();
        let kept = kept
            .iter()
            .filter_map(|&(pos, key)| slot_of.get(&pos).map(|&slot| KeptRow { slot, key }))
            .collect();

        EntityWindow {
            key,
            rows: positions.iter().map(|&pos| sorted[pos]).collect(),
            positions,
            kept,
            total_rows: sorted.len(),
        }
    }
}

/// Kept `(position, rank)` pairs of one sorted entity. A rank counts only when
/// it is a finite integer in `1..=records_keep`.
fn kept_by_rank(
    key: &EntityKey,
    sorted: &[usize],
    ranks: &[Option<f64>],
    records_keep: usize,
) -> Result<Vec<(usize, u64)>> {
    let mut kept = Vec::new();
    let mut seen = HashMap::new();

    for (pos, &row) in sorted.iter().enumerate() {
        let rank = match ranks[row] {
            Some(r) if r.is_finite() && r.fract() == 0.0 && r >= 1.0 && r <= records_keep as f64 => {
                r as u64
            }
            _ => continue,
        };
        if let Some(previous) = seen.insert(rank, row) {
            return Err(RuntimeError::PreconditionError(format!(
                "entity {} has rank {} on rows {} and {}",
                key, rank, previous, row
            )));
        }
        kept.push((pos, rank));
    }

    Ok(kept)
}
