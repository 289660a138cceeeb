use std::env;

use eyre::eyre;

pub const DEFAULT_BUCKET: &str = "medcamp";
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Runtime configuration, read from the Lambda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bucket: String,
    pub region: String,
    pub cognito_user_pool_id: String,
    pub cognito_client_id: String,
    /// PEM-encoded RSA public key the user pool signs tokens with.
    pub cognito_jwt_public_key: String,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| get(name).ok_or_else(|| eyre!("{name} must be set"));

        Ok(Self {
            bucket: get("MEDCAMP_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            cognito_user_pool_id: required("COGNITO_USER_POOL_ID")?,
            cognito_client_id: required("COGNITO_CLIENT_ID")?,
            cognito_jwt_public_key: required("COGNITO_JWT_PUBLIC_KEY")?,
        })
    }
}
