use thiserror::Error;

use medcamp_core::models::user::{Area, Role};
use medcamp_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A required field is missing or malformed. Raised before any write.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The record's current state does not allow the transition. Nothing was written.
    #[error("{0}")]
    Precondition(String),

    /// The record changed between read and write.
    #[error("{0} was modified concurrently, reload and retry")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("an authenticated principal is required")]
    Unauthenticated,

    #[error("role {role} cannot access {area}")]
    Forbidden { role: Role, area: Area },

    #[error("operation failed: {0}")]
    Storage(#[from] StorageError),
}

impl LifecycleError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        LifecycleError::Precondition(message.into())
    }
}
