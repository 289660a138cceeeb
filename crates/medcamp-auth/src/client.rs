use aws_sdk_cognitoidentityprovider::Client;

/// Cognito client for the user pool's region. The Lambda runtime sets
/// `AWS_REGION`, but the pool may live elsewhere.
pub async fn build_client_with_region(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}
