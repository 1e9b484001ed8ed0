pub mod create_tables;
pub mod etl;
pub mod setup;
pub mod status;
pub mod teardown;

use crate::config::Settings;
use crescendo_aws::{load_sdk_config, AwsResourceClient};

/// Build the provider client for the configured account access.
pub async fn resource_client(settings: &Settings) -> AwsResourceClient {
    let sdk_config = load_sdk_config(&settings.aws_access()).await;
    AwsResourceClient::new(&sdk_config)
}
