//! Error types for manifest analysis.
//!
//! Every failure that aborts an analysis task is an [`AnalysisError`]. Errors
//! bubble up with `?` to the task boundary, where they are turned into a single
//! failure report for the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an analysis task.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// I/O failure without a known file (store writes, stdout, ...)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A numeric manifest field (`replicas`, any port) holds a non-integer value
    #[error("Invalid integer for `{field}` at line {line}: {value:?}")]
    InvalidNumber {
        line: u32,
        field: String,
        value: String,
    },

    /// A task location that cannot be interpreted as a URL or path
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// A task location using a scheme other than `file:`
    #[error("Unsupported location (only file locations can be analyzed): {0}")]
    UnsupportedLocation(String),

    /// A model document required by the task does not exist
    #[error("{0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Analysis task was cancelled")]
    Cancelled,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parsing failed: {0}")]
    ParsingFailed(String),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
