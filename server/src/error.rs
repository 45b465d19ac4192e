//! Handler errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use todo_core::{StoreError, TodoId};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request body is not a JSON todo.
    #[error("Invalid input")]
    Decode(#[source] serde_json::Error),

    /// The path segment after `/todos/` is not an integer.
    #[error("Invalid todo ID")]
    InvalidId(String),

    /// Title or description is empty.
    #[error("Please enter your information")]
    Validation,

    #[error("Todo not found")]
    NotFound(TodoId),

    /// The store failed for a reason other than a missing record.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No route matches the path.
    #[error("Not found")]
    RouteNotFound,
}

impl ServerError {
    /// Splits a store failure into a 404 or a 500 carrying `context` as the
    /// client-facing message.
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServerError::NotFound(id),
            source => ServerError::Storage { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Decode(_) | ServerError::InvalidId(_) | ServerError::Validation => {
                StatusCode::BAD_REQUEST
            }
            ServerError::NotFound(_) | ServerError::RouteNotFound => StatusCode::NOT_FOUND,
            ServerError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ServerError::Storage { context, source } => {
                error!(error = %source, "{context}");
            }
            ServerError::Decode(err) => debug!(error = %err, "rejected request body"),
            ServerError::InvalidId(raw) => debug!(id = %raw, "rejected todo id"),
            ServerError::NotFound(id) => debug!(id, "todo not found"),
            ServerError::Validation | ServerError::MethodNotAllowed | ServerError::RouteNotFound => {
                debug!(status = status.as_u16(), "{self}")
            }
        }

        let body = json!({ "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
