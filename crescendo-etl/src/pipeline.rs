//! Load-and-transform pipeline
//!
//! Stage one bulk-copies the raw event and song records from object
//! storage into the staging tables, authenticated as the access role.
//! Stage two populates the star schema with five insert-transforms in a
//! fixed order; `time` must come after `songplays` because it derives
//! its rows from the landed timestamps.

use crate::error::Result;
use crate::executor::{execute_committed, SqlExecutor};
use crate::statements::{STAGING_EVENTS_COPY, STAGING_SONGS_COPY, TRANSFORMS};

/// Parameters of the staging load
#[derive(Debug, Clone)]
pub struct StagingSources {
    /// Identity the warehouse assumes for the reads
    pub role_arn: String,
    pub region: String,
    /// Raw event records
    pub events_uri: String,
    /// Column mapping document for the event records
    pub events_jsonpath_uri: String,
    /// Raw song records
    pub songs_uri: String,
}

/// Render the two bulk-copy statements for the given sources.
pub fn copy_statements(sources: &StagingSources) -> Result<Vec<(&'static str, String)>> {
    let events = STAGING_EVENTS_COPY.render(&[
        ("events_uri", &sources.events_uri),
        ("role_arn", &sources.role_arn),
        ("region", &sources.region),
        ("jsonpath_uri", &sources.events_jsonpath_uri),
    ])?;
    let songs = STAGING_SONGS_COPY.render(&[
        ("songs_uri", &sources.songs_uri),
        ("role_arn", &sources.role_arn),
        ("region", &sources.region),
    ])?;
    Ok(vec![
        (STAGING_EVENTS_COPY.name(), events),
        (STAGING_SONGS_COPY.name(), songs),
    ])
}

pub struct Pipeline<E> {
    executor: E,
}

impl<E: SqlExecutor> Pipeline<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Bulk-load the staging tables from object storage.
    pub async fn load_staging(&mut self, sources: &StagingSources) -> Result<()> {
        for (name, sql) in copy_statements(sources)? {
            execute_committed(&mut self.executor, name, &sql).await?;
        }
        Ok(())
    }

    /// Populate the star schema from the staging tables.
    pub async fn transform(&mut self) -> Result<()> {
        for statement in &TRANSFORMS {
            execute_committed(&mut self.executor, statement.name(), &statement.render(&[])?)
                .await?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> E {
        self.executor
    }
}
