//! panelscore parser - YAML feature spec parser
//!
//! This crate converts YAML feature spec documents into validated
//! [`panelscore_core::FeatureSpec`] values.

pub mod error;
pub mod spec_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use spec_parser::FeatureSpecParser;
pub use yaml_parser::YamlParser;
