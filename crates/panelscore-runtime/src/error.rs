//! Runtime error types

use panelscore_core::CoreError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Malformed feature spec, raised before any computation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input table does not satisfy what the engine requires of it
    #[error("Precondition failed: {0}")]
    PreconditionError(String),

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Table or column level failure
    #[error(transparent)]
    Core(CoreError),

    /// Broken internal invariant
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CoreError> for RuntimeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigError(message) => RuntimeError::ConfigError(message),
            CoreError::TypeError(message) => RuntimeError::TypeError(message),
            other => RuntimeError::Core(other),
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
