use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use tracing::{info, warn};

use medcamp_audit::actions;
use medcamp_audit::events::AuditEvent;
use medcamp_core::models::user::{AccountStatus, Principal, UserRecord};
use medcamp_core::store_keys;
use medcamp_storage::json;
use medcamp_storage::store::DocumentStore;

use crate::error::AuthError;
use crate::jwt::TokenVerifier;
use crate::provider::{IdentityProvider, SessionTokens};

/// Failed sign-in attempts allowed per email before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// How long a lockout lasts, measured from the most recent failed attempt.
pub const LOCKOUT_DURATION: SignedDuration = SignedDuration::from_mins(15);

/// A signed-in session returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub principal: Principal,
    pub tokens: SessionTokens,
}

#[derive(Debug, Clone, Copy)]
struct FailedAttempts {
    count: u32,
    last_failure: Timestamp,
}

/// Turns credentials or bearer tokens into a [`Principal`].
///
/// The role comes from `users/<uid>` in the document store, not from the
/// identity provider. Accounts without a role or marked `blocked` are refused.
pub struct SessionManager<P, S> {
    provider: P,
    store: Arc<S>,
    verifier: TokenVerifier,
    attempts: Mutex<HashMap<String, FailedAttempts>>,
}

impl<P: IdentityProvider, S: DocumentStore> SessionManager<P, S> {
    pub fn new(provider: P, store: Arc<S>, verifier: TokenVerifier) -> Self {
        Self {
            provider,
            store,
            verifier,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.sign_in_at(email, password, Timestamp::now()).await
    }

    /// Sign in with an explicit clock, used for the lockout window.
    pub async fn sign_in_at(
        &self,
        email: &str,
        password: &str,
        now: Timestamp,
    ) -> Result<Session, AuthError> {
        let attempt_key = email.trim().to_lowercase();
        self.check_lockout(&attempt_key, now)?;

        match self.authenticate(email.trim(), password, now).await {
            Ok(session) => {
                self.attempts_lock().remove(&attempt_key);
                info!(uid = %session.principal.uid, role = %session.principal.role, "signed in");
                AuditEvent::new(
                    actions::SESSION_SIGNED_IN,
                    actions::RESOURCE_USER,
                    &session.principal.uid,
                    &session.principal.email,
                )
                .emit();
                Ok(session)
            }
            Err(e) => {
                self.record_failure(&attempt_key, now);
                warn!(email = %attempt_key, error = %e, "sign-in failed");
                Err(e)
            }
        }
    }

    /// Number of emails with failed sign-ins still being tracked.
    pub fn tracked_failures(&self) -> usize {
        self.attempts_lock().len()
    }

    /// Resolve a bearer token to a principal, applying the same role and
    /// blocked-account checks as sign-in.
    pub async fn authenticate_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.verifier.verify(token)?;
        let email = claims
            .email()
            .ok_or_else(|| AuthError::InvalidToken("token carries no email".to_string()))?
            .to_string();
        let (principal, _) = self.resolve_principal(&claims.sub, &email).await?;
        Ok(principal)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: Timestamp,
    ) -> Result<Session, AuthError> {
        let signed_in = self.provider.sign_in(email, password).await?;
        let (principal, (document, etag)) = self
            .resolve_principal(&signed_in.identity.uid, &signed_in.identity.email)
            .await?;

        self.stamp_last_login(&principal.uid, document, &etag, now).await;

        Ok(Session {
            principal,
            tokens: signed_in.tokens,
        })
    }

    async fn resolve_principal(
        &self,
        uid: &str,
        email: &str,
    ) -> Result<(Principal, (serde_json::Value, String)), AuthError> {
        let key = store_keys::user(uid);
        let (document, etag): (serde_json::Value, String) =
            json::try_load_json(self.store.as_ref(), &key)
                .await?
                .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))?;

        let record: UserRecord = serde_json::from_value(document.clone())
            .map_err(|e| AuthError::UserNotFound(format!("{uid}: unreadable user record: {e}")))?;

        if record.status == AccountStatus::Blocked {
            return Err(AuthError::Blocked(email.to_string()));
        }
        let role = record
            .role
            .ok_or_else(|| AuthError::RoleMissing(uid.to_string()))?;

        let principal = Principal {
            uid: uid.to_string(),
            email: email.to_string(),
            role,
        };
        Ok((principal, (document, etag)))
    }

    // Best effort: a lost race or store error must not fail the sign-in.
    async fn stamp_last_login(
        &self,
        uid: &str,
        mut document: serde_json::Value,
        etag: &str,
        now: Timestamp,
    ) {
        let Some(fields) = document.as_object_mut() else {
            return;
        };
        fields.insert(
            "lastLogin".to_string(),
            serde_json::Value::String(now.to_string()),
        );

        let key = store_keys::user(uid);
        if let Err(e) = json::save_json_if_match(self.store.as_ref(), &key, &document, etag).await {
            warn!(uid, error = %e, "failed to stamp lastLogin");
        }
    }

    fn check_lockout(&self, attempt_key: &str, now: Timestamp) -> Result<(), AuthError> {
        let mut attempts = self.attempts_lock();
        let Some(entry) = attempts.get(attempt_key).copied() else {
            return Ok(());
        };

        let elapsed = now.duration_since(entry.last_failure);
        if elapsed > LOCKOUT_DURATION {
            attempts.remove(attempt_key);
            return Ok(());
        }

        if entry.count >= MAX_LOGIN_ATTEMPTS {
            let remaining = LOCKOUT_DURATION - elapsed;
            let retry_after_minutes = ((remaining.as_secs() + 59) / 60).max(1);
            return Err(AuthError::LockedOut {
                retry_after_minutes,
            });
        }

        Ok(())
    }

    // Expired entries of every email are dropped here, so the map only holds
    // emails that failed within the lockout window.
    fn record_failure(&self, attempt_key: &str, now: Timestamp) {
        let mut attempts = self.attempts_lock();
        attempts.retain(|_, entry| now.duration_since(entry.last_failure) <= LOCKOUT_DURATION);
        let entry = attempts
            .entry(attempt_key.to_string())
            .or_insert(FailedAttempts {
                count: 0,
                last_failure: now,
            });
        entry.count += 1;
        entry.last_failure = now;
    }

    fn attempts_lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, FailedAttempts>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
