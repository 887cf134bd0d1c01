//! Error types for L1Rate

use thiserror::Error;

/// L1Rate error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (bad binning, empty menu, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Normalization precondition violated
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Malformed event record from the event source
    #[error("Event source error: {0}")]
    EventSource(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
