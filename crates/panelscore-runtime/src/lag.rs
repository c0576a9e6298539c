//! Lag engine
//!
//! Shifts target values back along an entity's sorted order. `Lead` needs no
//! separate algorithm: the partitioner has already reversed the order.

use crate::error::Result;
use crate::frame::FeatureFrame;
use crate::partition::EntityWindow;
use crate::schema::OutputSchema;
use panelscore_core::Table;

/// Computes the lag family of one entity
pub struct LagEngine<'a> {
    schema: &'a OutputSchema,
}

impl<'a> LagEngine<'a> {
    pub fn new(schema: &'a OutputSchema) -> Self {
        Self { schema }
    }

    /// One column per `(target, lag)` in schema order, one row per kept row.
    /// A lag reaching past the start of the entity's history is missing.
    pub fn compute(&self, table: &Table, window: &EntityWindow) -> Result<FeatureFrame> {
        let mut frame = FeatureFrame::new(window.kept.iter().map(|k| k.key).collect());

        for column in &self.schema.lags {
            let values = table.numbers(&column.column.target)?;
            let lag = column.column.index;
            let shifted = window
                .kept
                .iter()
                .map(|kept| window.shifted_row(kept.slot, lag).and_then(|row| values[row]))
                .collect();
            frame.push_column(column.name.clone(), shifted)?;
        }

        Ok(frame)
    }
}
