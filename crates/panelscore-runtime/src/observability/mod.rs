//! Observability module
//!
//! Run metrics (counters, timing histograms) and progress reporting.

pub mod metrics;
pub mod progress;

pub use metrics::{Counter, Histogram, RunMetrics};
pub use progress::ProgressTracker;
