//! Error types for provisioning operations

use thiserror::Error;

/// Result type alias using ProvisionError
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Errors from provisioning and resolution operations
///
/// `NotFound` and `AlreadyExists` are expected outcomes in parts of the
/// lifecycle (teardown polling, setup re-runs) and must stay
/// distinguishable from `Provider` failures.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Resource absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already present (setup re-run without teardown)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Cluster exists but is not yet available
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Provider rate limiting
    #[error("Throttled: {0}")]
    Throttled(String),

    /// A configured wait bound was exceeded
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other provider API failure (network, permission, service error)
    #[error("Provider error: {0}")]
    Provider(String),
}

impl ProvisionError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// True for the error kind that signals resource absence
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
