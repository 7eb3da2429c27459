//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::Error;

/// An error returned from a request handler.
///
/// Serialises as `{ "error": message }` with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation (400).
    #[error("{0}")]
    BadRequest(String),

    /// No record has the requested id (404).
    #[error("record {0} not found")]
    NotFound(i64),

    /// The route exists but does nothing yet (501).
    #[error("{0}")]
    NotImplemented(&'static str),

    /// Storage or runtime fault (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The status code this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Syntax, content-type and shape problems are all the caller's fault.
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && !matches!(self, Self::NotImplemented(_)) {
            error!(%status, error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
