use medcamp_auth::client;
use medcamp_auth::cognito::CognitoProvider;
use medcamp_auth::error::AuthError;
use medcamp_auth::jwt::TokenVerifier;
use medcamp_auth::provider::IdentityProvider;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} not set"))
}

/// Signs in against a real user pool.
///
/// Run with:
/// AWS_REGION=<region> COGNITO_USER_POOL_ID=<pool> COGNITO_CLIENT_ID=<client>
/// COGNITO_JWT_PUBLIC_KEY=<pem> MEDCAMP_TEST_EMAIL=<email> MEDCAMP_TEST_PASSWORD=<password>
/// cargo test -p medcamp-auth --test cognito -- --ignored
#[tokio::test]
#[ignore]
async fn password_sign_in_against_cognito() {
    let region = env("AWS_REGION");
    let verifier = TokenVerifier::cognito(
        env("COGNITO_JWT_PUBLIC_KEY").as_bytes(),
        &region,
        &env("COGNITO_USER_POOL_ID"),
    )
    .unwrap();
    let provider = CognitoProvider::new(
        client::build_client_with_region(&region).await,
        env("COGNITO_CLIENT_ID"),
        verifier,
    );

    let email = env("MEDCAMP_TEST_EMAIL");
    let signed_in = provider
        .sign_in(&email, &env("MEDCAMP_TEST_PASSWORD"))
        .await
        .unwrap();
    assert!(!signed_in.identity.uid.is_empty());
    assert!(signed_in.identity.email.eq_ignore_ascii_case(&email));
    assert!(!signed_in.tokens.id_token.is_empty());

    let err = provider.sign_in(&email, "definitely-wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::AuthFailed(_)));
}
