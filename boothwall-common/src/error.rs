//! Common error types for boothwall

use thiserror::Error;

/// Common result type for boothwall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across boothwall components
#[derive(Error, Debug)]
pub enum Error {
    /// Operation conflicts with current state (session already running)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Requested resource not found (missing asset, slot, or source file)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
