//! Error types for synap-directory
//!
//! Every API failure renders as `{"success": false, "error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use synap_common::api::ApiFailure;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// No valid session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Session lacks the admin role (403)
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate slug or row still referenced (409)
    #[error("{0}")]
    Conflict(String),

    /// Remote site or image host failure (502)
    #[error("{0}")]
    Upstream(String),

    /// Feature needs configuration that is missing (503)
    #[error("{0}")]
    Unavailable(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        }

        (status, Json(ApiFailure::new(self.to_string()))).into_response()
    }
}

impl From<synap_common::Error> for ApiError {
    fn from(err: synap_common::Error) -> Self {
        use synap_common::Error;

        if err.is_unique_violation() {
            return ApiError::Conflict("A record with this slug already exists".to_string());
        }
        if err.is_foreign_key_violation() {
            return ApiError::Conflict("Record is still referenced by other content".to_string());
        }

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Internal(msg) => ApiError::Internal(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        synap_common::Error::from(err).into()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_errors_map_to_status() {
        let cases = [
            (synap_common::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (synap_common::Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (synap_common::Error::Conflict("x".into()), StatusCode::CONFLICT),
            (synap_common::Error::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (synap_common::Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_message_is_not_prefixed() {
        let err = ApiError::from(synap_common::Error::NotFound("Bookmark not found".into()));
        assert_eq!(err.to_string(), "Bookmark not found");
    }
}
