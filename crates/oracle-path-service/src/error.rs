//! API error types and responses.
//!
//! Collaborator failures surface as themed, non-technical messages; the
//! underlying detail is logged server-side and never forwarded to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but insufficient permissions.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists or invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Daily free-tier quota exhausted.
    #[error("daily limit reached")]
    LimitReached,

    /// The inference backend is rate limiting us.
    #[error("oracle rate limited")]
    OracleRateLimited,

    /// The inference backend failed or is misconfigured.
    #[error("oracle unavailable")]
    OracleUnavailable,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            Self::LimitReached => (
                StatusCode::TOO_MANY_REQUESTS,
                "limit_reached",
                "The Oracle has shared all its visions for today. Return tomorrow, \
                 or walk the premium path for unlimited readings."
                    .to_string(),
            ),
            Self::OracleRateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "oracle_rate_limited",
                "The Oracle rests between visions. Ask again in a moment.".to_string(),
            ),
            Self::OracleUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "oracle_unavailable",
                "The Oracle's sight is clouded. Please try again shortly.".to_string(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<oracle_path_store::StoreError> for ApiError {
    fn from(err: oracle_path_store::StoreError) -> Self {
        match err {
            oracle_path_store::StoreError::SlugTaken { slug } => {
                Self::Conflict(format!("slug already taken: {slug}"))
            }
            oracle_path_store::StoreError::Database(msg)
            | oracle_path_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
