//! Common error types used throughout framevault.
//!
//! This module provides a unified error type covering catalog and filesystem
//! failure cases: missing entries, database reads, store writes, and artifact
//! deletion.

use std::path::PathBuf;

/// Common error type for framevault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested catalog entry was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database read failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The persistence layer rejected an upsert or delete.
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    /// A screenshot or video artifact could not be removed from disk.
    #[error("Failed to delete file {}: {message}", path.display())]
    FileDelete { path: PathBuf, message: String },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new StoreWrite error.
    pub fn store_write<S: Into<String>>(msg: S) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Create a new FileDelete error.
    pub fn file_delete<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self::FileDelete {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
