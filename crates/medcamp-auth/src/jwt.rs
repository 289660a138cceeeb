use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims carried by a Cognito ID or access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub token_use: String,
    pub exp: u64,
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        rename = "cognito:username",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
}

impl Claims {
    /// Email for audit stamping. Access tokens carry only the username,
    /// which is the email for this user pool.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().or(self.username.as_deref())
    }
}

pub fn cognito_issuer(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}")
}

/// Verifies bearer tokens against one key and issuer.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(key: DecodingKey, algorithm: Algorithm, issuer: &str) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.validate_exp = true;
        // ID tokens carry `aud`, access tokens carry `client_id` instead.
        validation.validate_aud = false;
        Self { key, validation }
    }

    /// Verifier for RS256 tokens issued by a Cognito user pool, given the
    /// pool's public signing key as PEM.
    pub fn cognito(public_key_pem: &[u8], region: &str, user_pool_id: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(public_key_pem)?;
        Ok(Self::new(
            key,
            Algorithm::RS256,
            &cognito_issuer(region, user_pool_id),
        ))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let token_use = &token_data.claims.token_use;
        if token_use != "access" && token_use != "id" {
            return Err(AuthError::InvalidToken(format!(
                "unexpected token_use: {token_use}"
            )));
        }

        Ok(token_data.claims)
    }
}
