use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use metabroker_store::StoreError;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request is missing data required to route it (project id).
    #[error("incomplete request: {0}")]
    IncompleteRequest(String),

    /// The policy engine denied the operation.
    #[error("access denied by policy rule for {operation}")]
    Forbidden { operation: String },

    /// Store errors pass through unchanged and are mapped to status codes
    /// here, at the protocol edge.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O error from the listener or runtime.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::IncompleteRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::PermissionDenied { .. }) => StatusCode::FORBIDDEN,
            Self::Store(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
