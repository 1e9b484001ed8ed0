//! Port for the external resource services
//!
//! Translates orchestration intents into provider API calls against
//! three services: identity/role, warehouse-cluster and compute-network.
//! Implementations carry no retry or backoff logic of their own;
//! failures propagate to the caller mapped onto `ProvisionError` kinds.

use crate::error::Result;
use crate::types::{ClusterDescriptor, ClusterSpec, IngressRule, RoleSpec};
use async_trait::async_trait;

/// Create/describe/delete/authorize operations on the remote provider
///
/// The provider is the single source of truth: every read is a live
/// query and nothing is cached locally.
#[async_trait]
pub trait ResourceProvider {
    /// Create the access role. Fails with `AlreadyExists` if the name is taken.
    async fn create_role(&self, spec: &RoleSpec) -> Result<()>;

    /// Attach a managed permission policy to the role.
    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    /// Resolve the role's identity handle. Fails with `NotFound` if absent.
    async fn role_arn(&self, role_name: &str) -> Result<String>;

    /// Detach a managed policy. Fails with `NotFound` if already detached
    /// or the role is absent; teardown tolerates that.
    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    /// Delete the role. Fails with `NotFound` if already absent.
    async fn delete_role(&self, role_name: &str) -> Result<()>;

    /// Begin asynchronous cluster provisioning; returns immediately.
    async fn create_cluster(&self, spec: &ClusterSpec, role_arn: &str) -> Result<()>;

    /// Live snapshot of the cluster. Fails with `NotFound` if absent.
    async fn describe_cluster(&self, identifier: &str) -> Result<ClusterDescriptor>;

    /// Begin asynchronous cluster teardown, skipping the final snapshot;
    /// returns immediately.
    async fn delete_cluster(&self, identifier: &str) -> Result<()>;

    /// First security group discovered on the given virtual network.
    async fn default_security_group(&self, vpc_id: &str) -> Result<String>;

    /// Open a network ingress rule.
    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<()>;

    /// Close a network ingress rule.
    async fn revoke_ingress(&self, rule: &IngressRule) -> Result<()>;
}
