//! Progress reporting
//!
//! Purely observational: the tracker never influences computed values.

use super::metrics::Counter;

/// Counts completed work units and logs each new tenth of the total at debug
#[derive(Debug)]
pub struct ProgressTracker {
    completed: Counter,
    total: u64,
    enabled: bool,
    last_decile: u64,
}

impl ProgressTracker {
    pub fn new(total: u64, enabled: bool) -> Self {
        Self {
            completed: Counter::new("work_units"),
            total,
            enabled,
            last_decile: 0,
        }
    }

    /// Record `units` completed work units
    pub fn advance(&mut self, units: u64) {
        self.completed.add(units);
        if !self.enabled || self.total == 0 {
            return;
        }

        let decile = (self.completed.get().min(self.total) * 10) / self.total;
        if decile > self.last_decile {
            self.last_decile = decile;
            tracing::debug!(
                "Progress: {}% ({}/{} work units)",
                decile * 10,
                self.completed.get().min(self.total),
                self.total
            );
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed.get()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completed fraction in `[0, 1]`; an empty run counts as done
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed.get().min(self.total)) as f64 / self.total as f64
        }
    }
}
