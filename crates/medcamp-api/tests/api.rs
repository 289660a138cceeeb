use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use medcamp_api::state::AppState;
use medcamp_auth::error::AuthError;
use medcamp_auth::jwt::{Claims, TokenVerifier};
use medcamp_auth::provider::{Identity, IdentityProvider, SessionTokens, SignedIn};
use medcamp_auth::session::SessionManager;
use medcamp_lifecycle::engine::Lifecycle;
use medcamp_storage::json;
use medcamp_storage::memory::InMemoryStore;

const SECRET: &[u8] = b"api-test-secret";
const ISSUER: &str = "https://issuer.test/pool";

struct FakeProvider {
    accounts: HashMap<String, (String, String)>,
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

fn fixed_now() -> Timestamp {
    "2024-06-10T08:00:00Z".parse().unwrap()
}

async fn app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    for (uid, role) in [
        ("u-super", "superadmin"),
        ("u-camps", "health-camp-admin"),
        ("u-tests", "individual-camp-admin"),
    ] {
        json::save_json(
            store.as_ref(),
            &format!("users/{uid}"),
            &json!({ "role": role, "status": "active" }),
        )
        .await
        .unwrap();
    }

    let provider = FakeProvider {
        accounts: HashMap::from([(
            "camps@example.com".to_string(),
            ("pw".to_string(), "u-camps".to_string()),
        )]),
    };
    let verifier = TokenVerifier::new(DecodingKey::from_secret(SECRET), Algorithm::HS256, ISSUER);
    let sessions = SessionManager::new(provider, store.clone(), verifier);
    let lifecycle = Lifecycle::with_clock(store, fixed_now);
    medcamp_api::router(AppState::new(sessions, lifecycle))
}

fn token(uid: &str, email: &str) -> String {
    let now = Timestamp::now().as_second();
    let claims = Claims {
        sub: uid.to_string(),
        iss: ISSUER.to_string(),
        token_use: "id".to_string(),
        exp: (now + 3600) as u64,
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

fn camps_admin() -> String {
    token("u-camps", "camps@example.com")
}

async fn send(app: &Router, method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        request = request.header("authorization", format!("Bearer {bearer}"));
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn camp_body() -> Value {
    json!({
        "date": "2024-06-15",
        "clinicCode": "clin-1",
        "address": "12 Market Road",
        "district": "Pune",
        "state": "Maharashtra",
        "pinCode": "411001",
        "mobileNo": "9876543210",
        "nurseName": "Asha Rao (N01)",
        "teamLeader": "Vikram (TL7)",
        "dcName": "Meena (DC2)",
        "agentName": "Ravi (AG9)",
        "roName": "Sunil (RO1)",
        "somName": "Priya (SOM3)"
    })
}

fn completion_body(finance: u64) -> Value {
    json!({
        "unitsSold": 40,
        "amountPaidToFinance": finance,
        "marketingExpense": 2000,
        "operationalExpense": 1000,
        "transactionId": "txn-001",
        "phleboName": "Kiran",
        "phleboMobileNo": "9123456780"
    })
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/camps", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/camps", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid signature but no user record.
    let ghost = token("u-ghost", "ghost@example.com");
    let (status, _) = send(&app, Method::GET, "/tests", Some(&ghost), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_sign_in_returns_principal_and_tokens() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/session",
        None,
        Some(json!({ "email": "camps@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"]["uid"], "u-camps");
    assert_eq!(body["principal"]["role"], "health-camp-admin");
    assert_eq!(body["tokens"]["idToken"], "id-u-camps");

    let (status, body) = send(
        &app,
        Method::POST,
        "/session",
        None,
        Some(json!({ "email": "camps@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn camp_lifecycle_over_http() {
    let app = app().await;
    let bearer = camps_admin();

    let mut invalid = camp_body();
    invalid["pinCode"] = json!("41100");
    let (status, body) = send(&app, Method::POST, "/camps", Some(&bearer), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "pinCode");

    let (status, scheduled) = send(&app, Method::POST, "/camps", Some(&bearer), Some(camp_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scheduled["status"], "scheduled");
    assert_eq!(scheduled["clinicCode"], "CLIN-1");
    let code = scheduled["campCode"].as_str().unwrap().to_string();
    assert!(code.starts_with("MSHC20240615"));
    let key = scheduled["key"].as_str().unwrap().to_string();

    let (status, found) = send(&app, Method::GET, &format!("/camps/by-code/{code}"), Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["key"], key.as_str());

    let (status, prefill) = send(&app, Method::GET, "/clinics/clin-1", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefill["district"], "PUNE");
    assert_eq!(prefill["locked"], true);

    // 12000 revenue against 8000 + 2000 + 1000 does not reconcile.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/camps/{key}/complete"),
        Some(&bearer),
        Some(completion_body(8000)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Amounts whose sum wraps around a u64 never reconcile.
    let mut wrapping = completion_body(0);
    wrapping["amountPaidToFinance"] = json!(u64::MAX);
    wrapping["marketingExpense"] = json!(12_001);
    wrapping["operationalExpense"] = json!(0);
    let (status, _) = send(&app, Method::POST, &format!("/camps/{key}/complete"), Some(&bearer), Some(wrapping)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The form sends a blank partner type when no partner is selected.
    let mut no_partner = completion_body(9000);
    no_partner["partnerType"] = json!("");
    let (status, completed) = send(
        &app,
        Method::POST,
        &format!("/camps/{key}/complete"),
        Some(&bearer),
        Some(no_partner),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["revenue"], 12_000);
    assert_eq!(completed["completedBy"], "camps@example.com");

    let (status, _) = send(&app, Method::POST, &format!("/camps/{key}/cancel"), Some(&bearer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, closed) = send(
        &app,
        Method::POST,
        &format!("/camps/{key}/report-status"),
        Some(&bearer),
        Some(json!({ "reportStatus": "sent" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["reportStatus"], "sent");

    let (status, board) = send(&app, Method::GET, "/camps/board?context=close", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    let closed_tab = board["tabs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|tab| tab["tab"] == "closed")
        .unwrap();
    assert_eq!(closed_tab["count"], 1);

    let (status, table) = send(&app, Method::GET, "/camps?status=completed", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["records"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::POST, "/camps/missing/cancel", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn roles_gate_camps_and_dashboards() {
    let app = app().await;
    let tests_admin = token("u-tests", "tests@example.com");
    let camps_admin = camps_admin();
    let superadmin = token("u-super", "super@example.com");

    let (status, _) = send(&app, Method::POST, "/camps", Some(&tests_admin), Some(camp_body())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/dashboard/camps", Some(&camps_admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, dashboard) = send(&app, Method::GET, "/dashboard/camps?state=all", Some(&superadmin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["metrics"]["totalCamps"], 0);

    let (status, metrics) = send(&app, Method::GET, "/dashboard/tests", Some(&superadmin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["totalTests"], 0);
}

#[tokio::test]
async fn test_entry_creation_reports_missing_fields() {
    let app = app().await;
    let bearer = token("u-tests", "tests@example.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/tests",
        Some(&bearer),
        Some(json!({ "name": "Lata", "address": "4 Temple Street" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "mobileNo, age, gender, testName");

    let (status, board) = send(&app, Method::GET, "/tests/board", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["tabs"].as_array().unwrap().len(), 4);
}
