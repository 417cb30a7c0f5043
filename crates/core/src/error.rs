//! Core error types

use thiserror::Error;

/// Core error type for the loyalty system
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
