//! Metrics collection for engine runs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Counter metric
#[derive(Debug, Clone)]
pub struct Counter {
    name: String,
    value: Arc<AtomicU64>,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment the counter
    pub fn inc(&self) {
        self.add(1);
    }

    /// Add a value to the counter
    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Reset the counter
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// Histogram metric for tracking distributions
#[derive(Debug, Clone)]
pub struct Histogram {
    name: String,
    values: Arc<RwLock<Vec<f64>>>,
}

impl Histogram {
    /// Create a new histogram
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observe a value
    pub fn observe(&self, value: f64) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(value);
    }

    /// Observe a duration in seconds
    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// Get count of observations
    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// Get sum of all values
    pub fn sum(&self) -> f64 {
        self.snapshot().iter().sum()
    }

    /// Get average value, 0 when empty
    pub fn avg(&self) -> f64 {
        let values = self.snapshot();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Get the largest observation, 0 when empty
    pub fn max(&self) -> f64 {
        self.snapshot().into_iter().fold(0.0, f64::max)
    }

    /// Reset the histogram
    pub fn reset(&self) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn snapshot(&self) -> Vec<f64> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Counters and timings of one engine run
#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub rows_in: Counter,
    pub rows_out: Counter,
    pub entities: Counter,
    /// Entities without a single kept row
    pub empty_entities: Counter,
    pub imputed_cells: Counter,
    /// Per-entity feature computation time
    pub entity_seconds: Histogram,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            rows_in: Counter::new("rows_in"),
            rows_out: Counter::new("rows_out"),
            entities: Counter::new("entities"),
            empty_entities: Counter::new("empty_entities"),
            imputed_cells: Counter::new("imputed_cells"),
            entity_seconds: Histogram::new("entity_seconds"),
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
