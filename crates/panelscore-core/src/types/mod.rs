//! Type system for panelscore
//!
//! This module contains the table model including:
//! - Cell values and entity keys
//! - Owned column buffers
//! - The columnar table
//! - Derived column naming

pub mod column;
pub mod naming;
pub mod table;
pub mod value;

pub use column::{CategoricalColumn, Column, ColumnKind};
pub use naming::{ColumnNamer, ColumnRole, FeatureColumn};
pub use table::Table;
pub use value::{EntityKey, Value};
