//! Schema management
//!
//! Issues the fixed DDL sequences against the warehouse: drop everything,
//! or create everything, each statement followed by a commit. Ordering
//! is owned by `statements`; this layer only walks the lists.

use crate::error::Result;
use crate::executor::{execute_committed, SqlExecutor};
use crate::statements::{CREATE_TABLES, DROP_TABLES};

pub struct SchemaManager<E> {
    executor: E,
}

impl<E: SqlExecutor> SchemaManager<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Drop all warehouse tables, fact table first.
    pub async fn drop_all(&mut self) -> Result<()> {
        for statement in &DROP_TABLES {
            execute_committed(&mut self.executor, statement.name(), &statement.render(&[])?)
                .await?;
        }
        Ok(())
    }

    /// Create all warehouse tables, dimensions before the fact table.
    pub async fn create_all(&mut self) -> Result<()> {
        for statement in &CREATE_TABLES {
            execute_committed(&mut self.executor, statement.name(), &statement.render(&[])?)
                .await?;
        }
        Ok(())
    }

    /// Hand the executor back, e.g. to run the pipeline on the same
    /// session.
    pub fn into_inner(self) -> E {
        self.executor
    }
}
