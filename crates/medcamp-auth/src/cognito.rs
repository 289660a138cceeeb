use std::collections::HashMap;

use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::error::ProvideErrorMetadata;
use aws_sdk_cognitoidentityprovider::types::AuthFlowType;
use tracing::info;

use crate::error::AuthError;
use crate::jwt::TokenVerifier;
use crate::provider::{Identity, IdentityProvider, SessionTokens, SignedIn};

/// Email/password sign-in against a Cognito user pool app client.
#[derive(Clone)]
pub struct CognitoProvider {
    client: Client,
    client_id: String,
    verifier: TokenVerifier,
}

impl CognitoProvider {
    pub fn new(client: Client, client_id: impl Into<String>, verifier: TokenVerifier) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            verifier,
        }
    }
}

impl IdentityProvider for CognitoProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        info!(email, "initiating auth");

        let tokens = initiate_auth(&self.client, &self.client_id, email, password).await?;

        // The ID token is the source of the stable user id.
        let claims = self.verifier.verify(&tokens.id_token)?;
        let identity = Identity {
            uid: claims.sub.clone(),
            email: claims.email().unwrap_or(email).to_string(),
        };

        Ok(SignedIn { identity, tokens })
    }
}

/// Run `USER_PASSWORD_AUTH`. A challenge (MFA, new password) is reported as
/// `AuthError::ChallengeRequired`; this service has no challenge UI.
pub async fn initiate_auth(
    client: &Client,
    user_pool_client_id: &str,
    username: &str,
    password: &str,
) -> Result<SessionTokens, AuthError> {
    let mut auth_params = HashMap::new();
    auth_params.insert("USERNAME".to_string(), username.to_string());
    auth_params.insert("PASSWORD".to_string(), password.to_string());

    let resp = client
        .initiate_auth()
        .auth_flow(AuthFlowType::UserPasswordAuth)
        .client_id(user_pool_client_id)
        .set_auth_parameters(Some(auth_params))
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            match err.code() {
                Some("NotAuthorizedException" | "UserNotFoundException") => {
                    AuthError::AuthFailed("incorrect email or password".to_string())
                }
                _ => AuthError::Cognito(err.to_string()),
            }
        })?;

    if let Some(result) = resp.authentication_result() {
        Ok(SessionTokens {
            id_token: result.id_token().unwrap_or_default().to_string(),
            access_token: result.access_token().unwrap_or_default().to_string(),
            refresh_token: result.refresh_token().unwrap_or_default().to_string(),
        })
    } else if let Some(challenge) = resp.challenge_name() {
        Err(AuthError::ChallengeRequired {
            challenge: challenge.as_str().to_string(),
        })
    } else {
        Err(AuthError::AuthFailed("unexpected response".to_string()))
    }
}
