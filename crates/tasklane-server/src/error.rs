//! Error responses for the HTTP API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors returned by API handlers.
///
/// Every variant renders as `{"error": "<message>"}` with a matching status.
/// Internal failures are logged and answered with a generic message so that
/// paths and other local details never leave the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// The referenced task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was well-formed but rejected by validation.
    #[error("{0}")]
    Validation(String),

    /// Anything else: storage failures, IO errors.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tasklane::Error> for ApiError {
    fn from(err: tasklane::Error) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            tracing::error!(error = %err, "Request failed");
            Self::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklane::domain::TaskId;
    use tasklane::error::{StorageError, ValidationError};

    #[test]
    fn test_validation_maps_to_422() {
        let err = ApiError::from(tasklane::Error::from(ValidationError::EmptyTitle));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Title cannot be empty");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(tasklane::Error::TaskNotFound(TaskId::new(4)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Task not found: 4");
    }

    #[test]
    fn test_storage_failure_is_opaque() {
        let err = ApiError::from(tasklane::Error::from(StorageError::IdExhausted));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
