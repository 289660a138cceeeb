use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};

use medcamp_auth::error::AuthError;
use medcamp_auth::jwt::{Claims, TokenVerifier};
use medcamp_auth::provider::{Identity, IdentityProvider, SessionTokens, SignedIn};
use medcamp_auth::session::SessionManager;
use medcamp_core::models::user::Role;
use medcamp_storage::json;
use medcamp_storage::memory::InMemoryStore;

const SECRET: &[u8] = b"test-signing-secret";
const ISSUER: &str = "https://issuer.test/pool";

/// Accepts a fixed set of email/password pairs.
struct FakeProvider {
    accounts: HashMap<String, (String, String)>,
}

impl FakeProvider {
    fn new(accounts: &[(&str, &str, &str)]) -> Self {
        Self {
            accounts: accounts
                .iter()
                .map(|(email, password, uid)| {
                    (email.to_string(), (password.to_string(), uid.to_string()))
                })
                .collect(),
        }
    }
}

impl IdentityProvider for FakeProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        match self.accounts.get(email) {
            Some((expected, uid)) if expected == password => Ok(SignedIn {
                identity: Identity {
                    uid: uid.clone(),
                    email: email.to_string(),
                },
                tokens: SessionTokens {
                    id_token: format!("id-{uid}"),
                    ..SessionTokens::default()
                },
            }),
            _ => Err(AuthError::AuthFailed("incorrect email or password".to_string())),
        }
    }
}

fn verifier() -> TokenVerifier {
    TokenVerifier::new(DecodingKey::from_secret(SECRET), Algorithm::HS256, ISSUER)
}

fn token(sub: &str, email: &str, token_use: &str, issuer: &str, exp_offset_secs: i64) -> String {
    let now = Timestamp::now().as_second();
    let claims = Claims {
        sub: sub.to_string(),
        iss: issuer.to_string(),
        token_use: token_use.to_string(),
        exp: (now + exp_offset_secs) as u64,
        iat: now as u64,
        email: Some(email.to_string()),
        username: None,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

async fn setup() -> (SessionManager<FakeProvider, InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    json::save_json(
        store.as_ref(),
        "users/u-admin",
        &serde_json::json!({ "role": "health-camp-admin", "status": "active", "name": "Admin" }),
    )
    .await
    .unwrap();
    json::save_json(
        store.as_ref(),
        "users/u-norole",
        &serde_json::json!({ "status": "active" }),
    )
    .await
    .unwrap();
    json::save_json(
        store.as_ref(),
        "users/u-blocked",
        &serde_json::json!({ "role": "superadmin", "status": "blocked" }),
    )
    .await
    .unwrap();

    let provider = FakeProvider::new(&[
        ("admin@example.com", "pw", "u-admin"),
        ("norole@example.com", "pw", "u-norole"),
        ("blocked@example.com", "pw", "u-blocked"),
        ("ghost@example.com", "pw", "u-ghost"),
    ]);
    let manager = SessionManager::new(provider, store.clone(), verifier());
    (manager, store)
}

#[tokio::test]
async fn sign_in_attaches_role_and_stamps_last_login() {
    let (manager, store) = setup().await;
    let now: Timestamp = "2024-05-01T09:30:00Z".parse().unwrap();

    let session = manager
        .sign_in_at("admin@example.com", "pw", now)
        .await
        .unwrap();
    assert_eq!(session.principal.uid, "u-admin");
    assert_eq!(session.principal.email, "admin@example.com");
    assert_eq!(session.principal.role, Role::HealthCampAdmin);
    assert_eq!(session.tokens.id_token, "id-u-admin");

    let (record, _): (serde_json::Value, String) =
        json::load_json(store.as_ref(), "users/u-admin").await.unwrap();
    assert_eq!(record["lastLogin"], "2024-05-01T09:30:00Z");
    // Fields the session manager does not model are preserved.
    assert_eq!(record["name"], "Admin");
    assert_eq!(record["role"], "health-camp-admin");
}

#[tokio::test]
async fn user_record_checks() {
    let (manager, _) = setup().await;

    let err = manager.sign_in("ghost@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound(_)));

    let err = manager.sign_in("norole@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::RoleMissing(_)));

    let err = manager.sign_in("blocked@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Blocked(_)));
}

#[tokio::test]
async fn five_failures_lock_the_account_for_fifteen_minutes() {
    let (manager, _) = setup().await;
    let start: Timestamp = "2024-05-01T09:00:00Z".parse().unwrap();

    for _ in 0..5 {
        let err = manager
            .sign_in_at("admin@example.com", "wrong", start)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AuthFailed(_)));
    }

    // Correct password is refused while locked; lockout counts from the last failure.
    let err = manager
        .sign_in_at("Admin@Example.com", "pw", start + SignedDuration::from_mins(5))
        .await
        .unwrap_err();
    match err {
        AuthError::LockedOut {
            retry_after_minutes,
        } => assert_eq!(retry_after_minutes, 10),
        other => panic!("expected lockout, got {other:?}"),
    }

    let later = start + SignedDuration::from_mins(16);
    manager
        .sign_in_at("admin@example.com", "pw", later)
        .await
        .unwrap();
}

#[tokio::test]
async fn expired_failures_of_other_emails_are_forgotten() {
    let (manager, _) = setup().await;
    let start: Timestamp = "2024-05-01T09:00:00Z".parse().unwrap();

    for i in 0..50 {
        let email = format!("nobody{i}@example.com");
        assert!(manager.sign_in_at(&email, "wrong", start).await.is_err());
    }
    assert_eq!(manager.tracked_failures(), 50);

    // One failure after the window clears every stale entry.
    let later = start + SignedDuration::from_mins(16);
    assert!(manager.sign_in_at("other@example.com", "wrong", later).await.is_err());
    assert_eq!(manager.tracked_failures(), 1);
}

#[tokio::test]
async fn success_resets_failed_attempts() {
    let (manager, _) = setup().await;
    let start: Timestamp = "2024-05-01T09:00:00Z".parse().unwrap();

    for i in 0..4 {
        let at = start + SignedDuration::from_secs(i);
        assert!(manager.sign_in_at("admin@example.com", "wrong", at).await.is_err());
    }
    manager
        .sign_in_at("admin@example.com", "pw", start + SignedDuration::from_secs(10))
        .await
        .unwrap();

    for i in 0..4 {
        let at = start + SignedDuration::from_secs(20 + i);
        assert!(matches!(
            manager.sign_in_at("admin@example.com", "wrong", at).await,
            Err(AuthError::AuthFailed(_))
        ));
    }
}

#[tokio::test]
async fn bearer_token_resolves_to_principal() {
    let (manager, _) = setup().await;

    let principal = manager
        .authenticate_token(&token("u-admin", "admin@example.com", "id", ISSUER, 3600))
        .await
        .unwrap();
    assert_eq!(principal.role, Role::HealthCampAdmin);
    assert_eq!(principal.email, "admin@example.com");

    let err = manager
        .authenticate_token(&token("u-blocked", "blocked@example.com", "id", ISSUER, 3600))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Blocked(_)));
}

#[tokio::test]
async fn bad_tokens_are_rejected() {
    let (manager, _) = setup().await;

    let expired = token("u-admin", "admin@example.com", "id", ISSUER, -3600);
    assert!(matches!(
        manager.authenticate_token(&expired).await,
        Err(AuthError::TokenExpired)
    ));

    let refresh = token("u-admin", "admin@example.com", "refresh", ISSUER, 3600);
    assert!(matches!(
        manager.authenticate_token(&refresh).await,
        Err(AuthError::InvalidToken(_))
    ));

    let foreign = token("u-admin", "admin@example.com", "id", "https://elsewhere", 3600);
    assert!(matches!(
        manager.authenticate_token(&foreign).await,
        Err(AuthError::InvalidToken(_))
    ));

    assert!(matches!(
        manager.authenticate_token("not-a-jwt").await,
        Err(AuthError::InvalidToken(_))
    ));
}
