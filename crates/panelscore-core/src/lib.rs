//! panelscore core - Core types and definitions for the panelscore feature engine
//!
//! This crate provides the fundamental types used across the panelscore workspace:
//! - Value types and entity keys
//! - The owned columnar table
//! - Feature spec definitions and the stat registry
//! - Derived column naming
//! - Error types

pub mod error;
pub mod spec;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use spec::{Direction, FeatureSpec, StatFunction, StatSpec, TimeUnit, WindowingLag};
pub use types::{
    CategoricalColumn, Column, ColumnKind, ColumnNamer, ColumnRole, EntityKey, FeatureColumn,
    Table, Value,
};
