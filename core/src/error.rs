//! Error types for the stores and the API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant on both sides because callers map it
//! to a client error (404) while everything else is a server-side failure.
//! For the stores that includes writes that matched no row: an UPDATE or
//! DELETE with zero affected rows is `NotFound`, not success.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TodoId;

/// Errors returned by `TodoStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live todo has this id. Soft-deleted rows count as missing.
    #[error("todo not found: {0}")]
    NotFound(TodoId),

    /// The database rejected a query or could not be reached.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The directory holding the database file could not be created.
    #[error("failed to prepare database directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
