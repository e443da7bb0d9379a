//! Core error types for habitlog-core.
//!
//! Storage, configuration and remote API failures each get their own
//! enum; `CoreError` wraps them so callers can use a single `?` chain.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Habit state could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote habit API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the file-backed stores.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The state file exists but could not be read
    #[error("Failed to read habit data from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file could not be written
    #[error("Failed to write habit data to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded for writing
    #[error("Failed to encode habit data: {0}")]
    Encode(#[from] serde_json::Error),

    /// Every store in a fallback chain failed
    #[error("No local store accepted the write: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Remote habit API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport or decode failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// Base URL or endpoint could not be joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
