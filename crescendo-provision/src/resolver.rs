//! Endpoint and role-identity resolution for downstream SQL clients
//!
//! The resolver never polls: callers are expected to have completed
//! setup first, and a cluster that is absent or still provisioning is
//! surfaced as `NotFound` / `NotReady` respectively.

use crate::error::{ProvisionError, Result};
use crate::provider::ResourceProvider;
use crate::types::Endpoint;

/// Resolves a ready cluster's network endpoint and the access role's
/// identity handle.
pub struct ConnectionResolver<P> {
    provider: P,
}

impl<P: ResourceProvider> ConnectionResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Network endpoint of an available cluster.
    ///
    /// Fails with `NotFound` if the cluster is absent and `NotReady` if
    /// it exists but has not finished provisioning.
    pub async fn endpoint(&self, identifier: &str) -> Result<Endpoint> {
        let descriptor = self.provider.describe_cluster(identifier).await?;
        if !descriptor.status.is_available() {
            return Err(ProvisionError::not_ready(format!(
                "cluster {identifier} is {}",
                descriptor.status
            )));
        }
        descriptor.endpoint.ok_or_else(|| {
            ProvisionError::not_ready(format!(
                "cluster {identifier} is available but reported no endpoint"
            ))
        })
    }

    /// Identity handle of the access role. Same contract as
    /// `ResourceProvider::role_arn`.
    pub async fn role_arn(&self, role_name: &str) -> Result<String> {
        self.provider.role_arn(role_name).await
    }
}
