//! Core error types for daytracker-core.
//!
//! One enum per failure domain, composed into [`DaysError`]. The propagation
//! policy is asymmetric: write paths surface [`StorageError`] to the caller
//! and leave persisted state unchanged, while read paths treat a
//! [`DecodeError`] as corruption to be repaired in place -- the corrupt key is
//! discarded and a default value substituted, and the error never reaches the
//! caller.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for daytracker-core.
#[derive(Error, Debug)]
pub enum DaysError {
    /// Persistence read or write failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted or imported text failed to parse
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Remote API call failed
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Caller-supplied input was rejected before any persistence attempt
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catch-all for anything not classified above; never fatal
    #[error("{0}")]
    Unknown(String),
}

/// Unexpected persistence failure (disk, permissions, quota).
///
/// Never used for unparseable data -- that is a [`DecodeError`].
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading the store file failed
    #[error("Failed to read store at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the store file failed
    #[error("Failed to write store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store directory could not be created
    #[error("Failed to create data directory {path}: {source}")]
    DirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the store contents failed
    #[error("Failed to encode store contents: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted text failed to decode into the entity graph.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed or truncated JSON
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A date string did not parse as a YYYY-MM-DD calendar date
    #[error("Invalid calendar date '{value}'")]
    BadDate { value: String },
}

/// Remote API failure. Calendar operations fall back to local storage on any
/// variant of this error; it is not fatal.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// Operation requires a session but no token is held
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Caller-supplied input is unusable. Rejected before any persistence
/// attempt, so the operation has no partial effect.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: &str, message: &str) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for DaysError
pub type Result<T, E = DaysError> = std::result::Result<T, E>;
