//! Error types for metadata store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during metadata store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key/value pair is not present in the project's store.
    #[error("metadata not found: {key}={value}")]
    NotFound { key: String, value: String },

    /// The OS denied access to the project's file.
    #[error("permission denied at OS level: {path}")]
    PermissionDenied { path: PathBuf },

    /// Serialization or deserialization failure.
    ///
    /// Only surfaced by strict decoding and by writes; the default lenient
    /// load never returns this.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error other than "file absent".
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant failure (e.g. a poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
