use std::collections::HashMap;

use medcamp_api::config::ApiConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_fill_bucket_and_region() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("COGNITO_USER_POOL_ID", "ap-south-1_pool"),
        ("COGNITO_CLIENT_ID", "client"),
        ("COGNITO_JWT_PUBLIC_KEY", "-----BEGIN PUBLIC KEY-----"),
    ]))
    .unwrap();
    assert_eq!(config.bucket, "medcamp");
    assert_eq!(config.region, "ap-south-1");
    assert_eq!(config.cognito_client_id, "client");
}

#[test]
fn empty_required_values_are_rejected() {
    let err = ApiConfig::from_lookup(lookup(&[
        ("COGNITO_USER_POOL_ID", "ap-south-1_pool"),
        ("COGNITO_CLIENT_ID", ""),
        ("COGNITO_JWT_PUBLIC_KEY", "pem"),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("COGNITO_CLIENT_ID"));
}
