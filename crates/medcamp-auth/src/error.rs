use thiserror::Error;

use medcamp_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("account temporarily locked, try again in {retry_after_minutes} minutes")]
    LockedOut { retry_after_minutes: i64 },

    #[error("sign-in challenge required: {challenge}")]
    ChallengeRequired { challenge: String },

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user role not found: {0}")]
    RoleMissing(String),

    #[error("account has been blocked: {0}")]
    Blocked(String),

    #[error("Cognito error: {0}")]
    Cognito(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
