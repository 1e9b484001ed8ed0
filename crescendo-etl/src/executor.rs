//! SQL execution port and the Postgres-protocol session
//!
//! The warehouse speaks the Postgres wire protocol, so the real session
//! is a single sqlx `PgConnection`. Statements go over the simple query
//! protocol (`raw_sql`): bulk-copy and DDL statements are not
//! preparable. Transaction discipline mirrors the classic driver
//! behavior the pipeline was written against: a transaction is opened
//! implicitly before the first statement and `commit` ends it, so every
//! statement the pipeline issues is followed by an explicit commit.

use crate::error::{EtlError, Result};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

/// Connection parameters for the warehouse database
#[derive(Debug, Clone)]
pub struct WarehouseDsn {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl WarehouseDsn {
    /// libpq-style connection string
    /// (`host=<addr> dbname=<db> port=<port> user=<user> password=<secret>`)
    pub fn to_connection_string(&self) -> String {
        format!(
            "host={} dbname={} port={} user={} password={}",
            self.host, self.dbname, self.port, self.user, self.password
        )
    }
}

/// Executes statements against the warehouse, one commit per statement
#[async_trait]
pub trait SqlExecutor {
    /// Execute a single statement. `name` is the statement's stable name,
    /// used for error context.
    async fn execute(&mut self, name: &str, sql: &str) -> Result<()>;

    /// Commit everything executed since the last commit.
    async fn commit(&mut self) -> Result<()>;
}

/// Execute one statement and commit it.
pub(crate) async fn execute_committed<E: SqlExecutor>(
    executor: &mut E,
    name: &str,
    sql: &str,
) -> Result<()> {
    tracing::info!(statement = name, "executing");
    executor.execute(name, sql).await?;
    executor.commit().await
}

/// A live warehouse session over one blocking connection
pub struct PgSession {
    conn: PgConnection,
    in_transaction: bool,
}

impl PgSession {
    /// Open the single connection all DDL/DML runs over.
    pub async fn connect(dsn: &WarehouseDsn) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&dsn.host)
            .port(dsn.port)
            .database(&dsn.dbname)
            .username(&dsn.user)
            .password(&dsn.password);

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| EtlError::sql("connect", e.to_string()))?;

        Ok(Self {
            conn,
            in_transaction: false,
        })
    }

    /// Close the session, flushing the protocol shutdown.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| EtlError::sql("close", e.to_string()))
    }
}

#[async_trait]
impl SqlExecutor for PgSession {
    async fn execute(&mut self, name: &str, sql: &str) -> Result<()> {
        if !self.in_transaction {
            sqlx::raw_sql("BEGIN")
                .execute(&mut self.conn)
                .await
                .map_err(|e| EtlError::sql(name, format!("begin failed: {e}")))?;
            self.in_transaction = true;
        }

        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| EtlError::sql(name, e.to_string()))?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            sqlx::raw_sql("COMMIT")
                .execute(&mut self.conn)
                .await
                .map_err(|e| EtlError::sql("commit", e.to_string()))?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_has_the_documented_form() {
        let dsn = WarehouseDsn {
            host: "dwh.example.com".to_string(),
            port: 5439,
            dbname: "dwh".to_string(),
            user: "dwhuser".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            dsn.to_connection_string(),
            "host=dwh.example.com dbname=dwh port=5439 user=dwhuser password=secret"
        );
    }
}
