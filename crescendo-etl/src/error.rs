//! Error types for the ETL layer

use thiserror::Error;

/// Result type alias using EtlError
pub type Result<T> = std::result::Result<T, EtlError>;

/// Errors from schema management and pipeline execution
#[derive(Debug, Error)]
pub enum EtlError {
    /// Statement execution or connection failure
    #[error("SQL error in {statement}: {message}")]
    Sql { statement: String, message: String },

    /// A template was rendered without values for all of its placeholders
    #[error("unresolved placeholder {placeholder} in statement {statement}")]
    UnresolvedPlaceholder {
        statement: String,
        placeholder: String,
    },

    /// Invalid connection parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EtlError {
    pub fn sql(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sql {
            statement: statement.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
