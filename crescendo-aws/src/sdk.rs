//! AWS SDK configuration loading

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;

/// Account access parameters, read once from configuration
///
/// Static credentials are optional: when absent the SDK default chain
/// (environment, shared profile, instance metadata) applies.
#[derive(Debug, Clone, Default)]
pub struct AwsAccess {
    /// AWS region
    pub region: String,
    /// Optional static access key id
    pub access_key_id: Option<String>,
    /// Optional static secret access key
    pub secret_access_key: Option<String>,
    /// Optional endpoint override (e.g. LocalStack)
    pub endpoint: Option<String>,
}

/// Load the shared SDK configuration for the configured account access.
///
/// Region always comes from `access`; credentials come from the static
/// pair when both halves are present, otherwise from the default chain.
pub async fn load_sdk_config(access: &AwsAccess) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(access.region.clone()));

    if let (Some(key), Some(secret)) = (&access.access_key_id, &access.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key.clone(),
            secret.clone(),
            None,
            None,
            "crescendo-config",
        ));
    }

    if let Some(endpoint) = &access.endpoint {
        loader = loader.endpoint_url(endpoint.clone());
    }

    loader.load().await
}
