//! panelscore SDK
//!
//! High-level API for building a scoring engine from a feature spec and
//! deriving lag, time-gap and rolling features from panel tables.

pub mod builder;
pub mod config;
pub mod error;
pub mod scoring_engine;

// Re-export main types
pub use builder::ScoringEngineBuilder;
pub use config::EngineConfig;
pub use error::{Result, SdkError};
pub use scoring_engine::ScoringEngine;

// Re-export commonly used types from dependencies
pub use panelscore_core::{Column, FeatureSpec, StatFunction, Table, Value};
pub use panelscore_runtime::{OutputSchema, RunMetrics, RunOutput, WindowPlan};
