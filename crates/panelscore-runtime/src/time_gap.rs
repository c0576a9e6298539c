//! Time-gap engine
//!
//! Inter-event time differences along an entity's sorted order. Channel 1 is
//! the gap between a row and its predecessor, channel `l` the gap between the
//! `l-1`-th and `l`-th predecessors.

use crate::error::{Result, RuntimeError};
use crate::frame::FeatureFrame;
use crate::partition::{EntityWindow, KeptRow};
use crate::schema::OutputSchema;
use chrono::NaiveDateTime;
use panelscore_core::{FeatureSpec, Table, TimeUnit};

/// Timestamps of the sort column; time gaps need a timestamp sort column
pub fn sort_timestamps<'t>(table: &'t Table, spec: &FeatureSpec) -> Result<&'t [Option<NaiveDateTime>]> {
    let column = table.column(&spec.sort_column)?;
    column.as_timestamps().ok_or_else(|| {
        RuntimeError::PreconditionError(format!(
            "time gaps need a timestamp sort column, '{}' is {}",
            spec.sort_column,
            column.kind().type_name()
        ))
    })
}

/// `later - earlier` in the given unit; negative when `later` is earlier
pub fn elapsed(later: NaiveDateTime, earlier: NaiveDateTime, unit: TimeUnit) -> f64 {
    let millis = (later - earlier).num_milliseconds() as f64;
    millis / 1000.0 / unit.seconds()
}

/// Computes the time-gap family of one entity
pub struct TimeGapEngine<'a> {
    unit: TimeUnit,
    schema: &'a OutputSchema,
}

impl<'a> TimeGapEngine<'a> {
    pub fn new(spec: &FeatureSpec, schema: &'a OutputSchema) -> Self {
        Self {
            unit: spec.time_unit,
            schema,
        }
    }

    /// Retained channels for every kept row with a present timestamp
    pub fn compute(&self, timestamps: &[Option<NaiveDateTime>], window: &EntityWindow) -> Result<FeatureFrame> {
        let kept: Vec<&KeptRow> = window
            .kept
            .iter()
            .filter(|k| timestamps[window.rows[k.slot]].is_some())
            .collect();
        let mut frame = FeatureFrame::new(kept.iter().map(|k| k.key).collect());

        // shifted[l] holds the timestamp l positions back; shifted[0] is the row itself
        let channels = self.schema.time_gaps.len();
        let shifted: Vec<Vec<Option<NaiveDateTime>>> = (0..=channels)
            .map(|lag| {
                kept.iter()
                    .map(|k| window.shifted_row(k.slot, lag).and_then(|row| timestamps[row]))
                    .collect()
            })
            .collect();

        for column in &self.schema.time_gaps {
            let channel = column.column.index;
            let values = shifted[channel - 1]
                .iter()
                .zip(&shifted[channel])
                .map(|(later, earlier)| match (later, earlier) {
                    (Some(later), Some(earlier)) => Some(elapsed(*later, *earlier, self.unit)),
                    _ => None,
                })
                .collect();
            frame.push_column(column.name.clone(), values)?;
        }

        Ok(frame)
    }

    /// Channel 1 for every working row, indexed by working slot. This is the
    /// series rolled under the time-gap family name.
    pub fn gap_series(&self, timestamps: &[Option<NaiveDateTime>], window: &EntityWindow) -> Vec<Option<f64>> {
        (0..window.len())
            .map(|slot| {
                let current = timestamps[window.rows[slot]]?;
                let previous = window.shifted_row(slot, 1).and_then(|row| timestamps[row])?;
                Some(elapsed(current, previous, self.unit))
            })
            .collect()
    }
}
