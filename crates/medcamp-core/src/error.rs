use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown staff role: {0}")]
    UnknownStaffRole(String),

    #[error("unknown partner type: {0}")]
    UnknownPartnerType(String),

    #[error("unknown user role: {0}")]
    UnknownRole(String),
}
