//! Core error types for the Nexora market sync core.
//!
//! Fetch failures never reach views as errors; they are classified and turned
//! into a stale flag. What remains here is storage, serialization and
//! configuration trouble.

use thiserror::Error;

use nexora_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Input validation failed: {0}")]
    Validation(String),
}

/// Errors raised by key-value store backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file could not be read.
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    /// The backing file could not be written.
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}
