use aws_sdk_polly::config::{retry::RetryConfig, BehaviorVersion, Credentials, Region};
use aws_sdk_polly::Client as PollyClient;

/// Polly client pointed at a port nothing listens on, with static credentials and no retries
pub fn create_unreachable_polly_client() -> PollyClient {
    let config = aws_sdk_polly::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "e2e"))
        .retry_config(RetryConfig::disabled())
        .endpoint_url("http://127.0.0.1:9") // Non-existent endpoint for testing
        .build();

    PollyClient::from_conf(config)
}
