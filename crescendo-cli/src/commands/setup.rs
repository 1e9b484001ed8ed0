use crate::commands::resource_client;
use crate::config::Settings;
use crate::error::CliResult;
use crescendo_provision::{Provisioner, WaitPolicy};

pub async fn run(settings: &Settings, wait: WaitPolicy) -> CliResult<()> {
    let cluster = settings.cluster_spec()?;
    println!("Provisioning warehouse environment for '{}'", cluster.identifier);

    let client = resource_client(settings).await;
    let provisioner =
        Provisioner::new(client, cluster, settings.role_spec()).with_wait_policy(wait);

    let report = provisioner.setup().await?;

    let secs = report.elapsed.as_secs();
    println!(
        "Cluster available at {}:{} after {:02}m {:02}s",
        report.endpoint.address,
        report.endpoint.port,
        secs / 60,
        secs % 60
    );
    println!("Access role: {}", report.role_arn);
    Ok(())
}
