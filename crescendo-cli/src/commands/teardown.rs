use crate::commands::resource_client;
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crescendo_provision::{Provisioner, WaitPolicy};

pub async fn run(settings: &Settings, wait: WaitPolicy) -> CliResult<()> {
    let cluster = settings.cluster_spec()?;
    println!("Tearing down warehouse environment for '{}'", cluster.identifier);

    let client = resource_client(settings).await;
    let provisioner =
        Provisioner::new(client, cluster, settings.role_spec()).with_wait_policy(wait);

    // Both stages always run; the report says what actually happened.
    let report = provisioner.teardown().await;
    println!("cluster clean-up: {}", report.cluster);
    println!("role clean-up: {}", report.role);

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::Teardown(
            "one or more teardown stages failed; re-run after fixing the cause".to_string(),
        ))
    }
}
