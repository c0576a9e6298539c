//! Parser error types

use panelscore_core::CoreError;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Type mismatch
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Unknown field
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Semantically invalid feature spec
    #[error(transparent)]
    ConfigError(#[from] CoreError),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParseError::MissingField {
            field: "targets".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: targets");

        let err: ParseError = CoreError::ConfigError("records_keep must be at least 1".to_string()).into();
        assert!(err.to_string().contains("records_keep"));
        assert!(matches!(err, ParseError::ConfigError(_)));
    }
}
