use crate::commands::resource_client;
use crate::config::Settings;
use crate::error::CliResult;
use crescendo_provision::ResourceProvider;

pub async fn run(settings: &Settings) -> CliResult<()> {
    let identifier = &settings.cluster.identifier;
    let client = resource_client(settings).await;

    match client.describe_cluster(identifier).await {
        Ok(descriptor) => {
            println!("cluster {identifier}: {}", descriptor.status);
            if let Some(endpoint) = descriptor.endpoint {
                println!("endpoint: {}:{}", endpoint.address, endpoint.port);
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("cluster {identifier}: absent");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
