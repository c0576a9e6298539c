//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] panelscore_parser::ParseError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] panelscore_runtime::RuntimeError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let error = SdkError::ConfigError("no feature spec".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("no feature spec"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sdk_error: SdkError = io_error.into();
        assert!(sdk_error.to_string().contains("I/O error"));
        assert!(sdk_error.to_string().contains("File not found"));
    }

    #[test]
    fn test_runtime_error_conversion() {
        let runtime = panelscore_runtime::RuntimeError::PreconditionError(
            "rank column 'rank' is missing".to_string(),
        );
        let sdk_error: SdkError = runtime.into();
        assert!(matches!(sdk_error, SdkError::RuntimeError(_)));
        assert!(sdk_error.to_string().starts_with("Runtime error"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse = panelscore_parser::ParseError::MissingField {
            field: "targets".to_string(),
        };
        let sdk_error: SdkError = parse.into();
        assert!(sdk_error.to_string().contains("targets"));
    }

    #[test]
    fn test_error_debug_format() {
        let error = SdkError::ConfigError("test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ConfigError"));
    }
}
