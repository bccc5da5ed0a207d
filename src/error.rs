//! Error types for siftscan

use thiserror::Error;

/// Result type alias for siftscan operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Error types for scanner operations
#[derive(Error, Debug)]
pub enum SiftError {
    /// File could not be opened or read
    #[error("Cannot read file '{path}': {reason}")]
    FileUnreadable { path: String, reason: String },

    /// Unit extraction produced nothing usable for a file
    #[error("No analysis units extracted from '{path}'")]
    NoUnits { path: String },

    /// Classifier returned output that does not line up with its input
    #[error("Classifier returned {got} labels for {expected} inputs")]
    ClassifierMismatch { expected: usize, got: usize },

    /// Classifier call failed
    #[error("Classifier error: {0}")]
    ClassifierError(String),

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cache could not be persisted (future runs would silently degrade)
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Scan target does not exist
    #[error("Scan target '{0}' does not exist")]
    TargetNotFound(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}
