use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use medcamp_auth::error::AuthError;
use medcamp_lifecycle::error::LifecycleError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String, field: Option<String> },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(String),
    /// A store or upstream failure. The reason is shown to the caller.
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::BadRequest { message, field } => (StatusCode::BAD_REQUEST, message, field),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg, None),
            ApiError::Unavailable(msg) => {
                tracing::error!(error = %msg, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
            }
        };

        (status, Json(ErrorBody { error: message, field })).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation { ref field, .. } => ApiError::BadRequest {
                field: Some(field.clone()),
                message: e.to_string(),
            },
            LifecycleError::Precondition(msg) => ApiError::Conflict(msg),
            LifecycleError::Conflict(_) => ApiError::Conflict(e.to_string()),
            LifecycleError::NotFound(_) => ApiError::NotFound(e.to_string()),
            LifecycleError::Unauthenticated => ApiError::Unauthorized(e.to_string()),
            LifecycleError::Forbidden { .. } => ApiError::Forbidden(e.to_string()),
            LifecycleError::Storage(_) => ApiError::Unavailable(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthFailed(_)
            | AuthError::ChallengeRequired { .. }
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::UserNotFound(_) => ApiError::Unauthorized(e.to_string()),
            AuthError::RoleMissing(_) | AuthError::Blocked(_) => ApiError::Forbidden(e.to_string()),
            AuthError::LockedOut { .. } => ApiError::TooManyRequests(e.to_string()),
            AuthError::Storage(_) => ApiError::Unavailable(format!("operation failed: {e}")),
            AuthError::Cognito(_) | AuthError::Jwt(_) => ApiError::Internal(e.to_string()),
        }
    }
}
