use crate::commands::resource_client;
use crate::config::Settings;
use crate::error::CliResult;
use crescendo_etl::{PgSession, Pipeline};
use crescendo_provision::ConnectionResolver;

pub async fn run(settings: &Settings) -> CliResult<()> {
    let client = resource_client(settings).await;
    let resolver = ConnectionResolver::new(client);
    let endpoint = resolver.endpoint(&settings.cluster.identifier).await?;
    let role_arn = resolver.role_arn(&settings.aws.iam_role).await?;

    println!("Connecting to warehouse at {}:{}", endpoint.address, endpoint.port);
    let session = PgSession::connect(&settings.dsn(&endpoint)?).await?;
    let mut pipeline = Pipeline::new(session);

    println!("Loading staging tables");
    pipeline.load_staging(&settings.staging_sources(role_arn)).await?;
    println!("Populating star schema");
    pipeline.transform().await?;

    pipeline.into_inner().close().await?;
    Ok(())
}
