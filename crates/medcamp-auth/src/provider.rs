use std::future::Future;

use serde::Serialize;

use crate::error::AuthError;

/// The identity established by a successful password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Tokens handed back to the client after sign-in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub tokens: SessionTokens,
}

/// External email/password authentication service.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SignedIn, AuthError>> + Send;
}
