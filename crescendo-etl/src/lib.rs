//! Warehouse ETL for crescendo
//!
//! Schema management and the two-stage pipeline (bulk load into staging
//! tables, insert-transform into the star schema), driven over a single
//! Postgres-protocol connection. All statements are named templates with
//! named placeholders; rendering rejects anything left unresolved.
//!
//! ```ignore
//! use crescendo_etl::{Pipeline, PgSession, SchemaManager, StagingSources, WarehouseDsn};
//!
//! let session = PgSession::connect(&dsn).await?;
//! let mut schema = SchemaManager::new(session);
//! schema.drop_all().await?;
//! schema.create_all().await?;
//!
//! let mut pipeline = Pipeline::new(schema.into_inner());
//! pipeline.load_staging(&sources).await?;
//! pipeline.transform().await?;
//! ```

pub mod error;
pub mod executor;
pub mod pipeline;
pub mod schema;
pub mod statements;
pub mod template;

pub use error::{EtlError, Result};
pub use executor::{PgSession, SqlExecutor, WarehouseDsn};
pub use pipeline::{copy_statements, Pipeline, StagingSources};
pub use schema::SchemaManager;
pub use template::StatementTemplate;
