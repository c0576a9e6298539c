//! panelscore runtime - feature computation for panel tables
//!
//! This crate turns a validated [`panelscore_core::FeatureSpec`] and a panel
//! table into lag, time-gap and rolling-statistic features:
//! - [`WindowPlanner`] sizes the history every kept row needs
//! - [`GroupPartitioner`] splits the table into per-entity working sets
//! - [`LagEngine`], [`TimeGapEngine`] and [`RollingStatEngine`] compute the
//!   feature families
//! - [`OutputAssembler`] merges them into the output table
//!
//! [`FeatureEngine`] runs the whole pipeline in scoring or full-history mode.

pub mod assembler;
pub mod engine;
pub mod error;
pub mod frame;
pub mod lag;
pub mod observability;
pub mod partition;
pub mod planner;
pub mod rolling;
pub mod schema;
pub mod time_gap;

// Re-export main types
pub use assembler::{MergeKind, OutputAssembler, CATEGORICAL_FILL, NUMERIC_FILL};
pub use engine::{FeatureEngine, RunOutput};
pub use error::{Result, RuntimeError};
pub use frame::{EntityFrames, FeatureFrame};
pub use lag::LagEngine;
pub use observability::{Counter, Histogram, ProgressTracker, RunMetrics};
pub use partition::{EntityWindow, GroupPartitioner, KeptRow, Selection};
pub use planner::{WindowPlan, WindowPlanner};
pub use rolling::{aggregate, RollingStatEngine};
pub use schema::{OutputSchema, SchemaColumn};
pub use time_gap::TimeGapEngine;
