use crate::commands::resource_client;
use crate::config::Settings;
use crate::error::CliResult;
use crescendo_etl::{PgSession, SchemaManager};
use crescendo_provision::ConnectionResolver;

pub async fn run(settings: &Settings) -> CliResult<()> {
    let client = resource_client(settings).await;
    let resolver = ConnectionResolver::new(client);
    let endpoint = resolver.endpoint(&settings.cluster.identifier).await?;

    println!("Connecting to warehouse at {}:{}", endpoint.address, endpoint.port);
    let session = PgSession::connect(&settings.dsn(&endpoint)?).await?;
    let mut schema = SchemaManager::new(session);

    println!("Dropping tables");
    schema.drop_all().await?;
    println!("Creating tables");
    schema.create_all().await?;

    schema.into_inner().close().await?;
    Ok(())
}
