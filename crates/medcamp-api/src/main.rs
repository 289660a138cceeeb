use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medcamp_api::config::ApiConfig;
use medcamp_api::state::AppState;
use medcamp_auth::cognito::CognitoProvider;
use medcamp_auth::jwt::TokenVerifier;
use medcamp_auth::session::SessionManager;
use medcamp_lifecycle::engine::Lifecycle;
use medcamp_storage::s3::S3Store;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;
    tracing::info!(bucket = %config.bucket, region = %config.region, "starting medcamp api");

    let s3 = medcamp_storage::client::build_client_with_region(&config.region).await;
    let store = Arc::new(S3Store::new(s3, config.bucket.clone()));

    let verifier = TokenVerifier::cognito(
        config.cognito_jwt_public_key.as_bytes(),
        &config.region,
        &config.cognito_user_pool_id,
    )?;
    let cognito = medcamp_auth::client::build_client_with_region(&config.region).await;
    let provider = CognitoProvider::new(cognito, config.cognito_client_id.clone(), verifier.clone());

    let state = AppState::new(
        SessionManager::new(provider, store.clone(), verifier),
        Lifecycle::new(store),
    );

    lambda_http::run(medcamp_api::router(state))
        .await
        .map_err(|e| eyre::eyre!(e))
}
