//! Provisioning lifecycle orchestration
//!
//! Drives the cluster lifecycle `Absent → Creating → Available →
//! (Deleting) → Absent`, observed purely by polling `describe_cluster`;
//! the provider offers no push notifications. Setup stops at the first
//! unexpected error and performs no rollback of partially-created
//! resources: re-running setup against residue surfaces `AlreadyExists`
//! and the operator intervenes. Teardown runs its two stages
//! unconditionally and reports each outcome instead of aborting.

use crate::error::{ProvisionError, Result};
use crate::provider::ResourceProvider;
use crate::types::{ClusterDescriptor, ClusterSpec, Endpoint, IngressRule, RoleSpec};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Polling parameters for the availability and deletion waits
///
/// `max_wait: None` means unbounded, matching the provider's unbounded
/// provisioning latency. A bound, when configured, yields
/// `ProvisionError::Timeout`.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    /// Fixed interval between `describe_cluster` probes; no backoff
    pub poll_interval: Duration,
    /// Optional overall bound on a single wait
    pub max_wait: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_wait: None,
        }
    }
}

/// Result of a completed setup run
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub endpoint: Endpoint,
    pub role_arn: String,
    pub elapsed: Duration,
}

/// Outcome of one teardown stage
#[derive(Debug)]
pub enum StageOutcome {
    /// Stage ran to completion; `warning` records anything tolerated on
    /// the way (resources already absent, a conflated poll error)
    Completed { warning: Option<String> },
    Failed(ProvisionError),
}

impl StageOutcome {
    fn completed() -> Self {
        Self::Completed { warning: None }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed { warning: None } => write!(f, "ok"),
            Self::Completed { warning: Some(w) } => write!(f, "ok ({w})"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Per-stage teardown outcomes
///
/// The cluster and role stages touch independent resources; they run
/// sequentially in this order but a failure in the first never prevents
/// the second from being attempted.
#[derive(Debug)]
pub struct TeardownReport {
    pub cluster: StageOutcome,
    pub role: StageOutcome,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        !self.cluster.is_failed() && !self.role.is_failed()
    }
}

/// Lifecycle orchestrator over a `ResourceProvider`
///
/// Exactly one orchestrator is assumed to act on a given cluster
/// identifier at a time; concurrent orchestrators would race on the
/// provider's resource records.
pub struct Provisioner<P> {
    provider: P,
    cluster: ClusterSpec,
    role: RoleSpec,
    wait: WaitPolicy,
}

impl<P: ResourceProvider> Provisioner<P> {
    pub fn new(provider: P, cluster: ClusterSpec, role: RoleSpec) -> Self {
        Self {
            provider,
            cluster,
            role,
            wait: WaitPolicy::default(),
        }
    }

    pub fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Create the role, attach its storage policy, submit cluster
    /// creation, wait for availability and open public ingress on the
    /// database port.
    ///
    /// Any step's failure surfaces immediately; later steps do not run
    /// and nothing already created is rolled back.
    pub async fn setup(&self) -> Result<SetupReport> {
        let started = Instant::now();

        info!(role = %self.role.name, "creating access role");
        self.provider.create_role(&self.role).await?;

        info!(role = %self.role.name, policy = %self.role.policy_arn, "attaching storage policy");
        self.provider
            .attach_policy(&self.role.name, &self.role.policy_arn)
            .await?;

        let role_arn = self.provider.role_arn(&self.role.name).await?;

        info!(cluster = %self.cluster.identifier, "submitting cluster creation");
        self.provider.create_cluster(&self.cluster, &role_arn).await?;

        let descriptor = self.wait_until_available().await?;
        let endpoint = descriptor.endpoint.ok_or_else(|| {
            ProvisionError::not_ready(format!(
                "cluster {} is available but reported no endpoint",
                self.cluster.identifier
            ))
        })?;
        let vpc_id = descriptor.vpc_id.ok_or_else(|| {
            ProvisionError::provider(format!(
                "cluster {} reported no virtual network",
                self.cluster.identifier
            ))
        })?;

        let group = self.provider.default_security_group(&vpc_id).await?;
        let rule = IngressRule::public_warehouse_port(&group, self.cluster.port);
        info!(group = %rule.security_group_id, port = rule.port, cidr = %rule.cidr, "opening ingress");
        self.provider.authorize_ingress(&rule).await?;

        Ok(SetupReport {
            endpoint,
            role_arn,
            elapsed: started.elapsed(),
        })
    }

    /// Revoke ingress and delete the cluster, then detach the policy and
    /// delete the role. Each stage's error is captured in the report so
    /// the other stage still runs.
    pub async fn teardown(&self) -> TeardownReport {
        let cluster = self.teardown_cluster().await;
        if let StageOutcome::Failed(e) = &cluster {
            warn!(cluster = %self.cluster.identifier, error = %e, "cluster clean-up failed");
        }

        let role = self.teardown_role().await;
        if let StageOutcome::Failed(e) = &role {
            warn!(role = %self.role.name, error = %e, "role clean-up failed");
        }

        TeardownReport { cluster, role }
    }

    /// Poll at the fixed interval until the status is exactly
    /// `available`. Every other status, transient or not, keeps the poll
    /// running.
    async fn wait_until_available(&self) -> Result<ClusterDescriptor> {
        let started = Instant::now();
        let deadline = self.wait.max_wait.map(|d| started + d);

        loop {
            let descriptor = self.provider.describe_cluster(&self.cluster.identifier).await?;
            if descriptor.status.is_available() {
                return Ok(descriptor);
            }
            debug!(
                cluster = %self.cluster.identifier,
                status = %descriptor.status,
                elapsed_secs = started.elapsed().as_secs(),
                "waiting for cluster availability"
            );
            self.check_deadline(deadline, "availability")?;
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    /// Poll until `describe_cluster` itself fails, the provider's signal
    /// for non-existence. `NotFound` is clean absence; any other describe
    /// error also ends the poll — only in this context — and is reported
    /// as a warning rather than conflated with success silently.
    async fn wait_until_gone(&self) -> Result<Option<String>> {
        let started = Instant::now();
        let deadline = self.wait.max_wait.map(|d| started + d);

        loop {
            match self.provider.describe_cluster(&self.cluster.identifier).await {
                Err(e) if e.is_not_found() => return Ok(None),
                Err(e) => {
                    warn!(
                        cluster = %self.cluster.identifier,
                        error = %e,
                        "deletion poll ended on a non-absence error; treating cluster as gone"
                    );
                    return Ok(Some(format!("deletion poll ended on: {e}")));
                }
                Ok(descriptor) => {
                    debug!(
                        cluster = %self.cluster.identifier,
                        status = %descriptor.status,
                        elapsed_secs = started.elapsed().as_secs(),
                        "waiting for cluster deletion"
                    );
                }
            }
            self.check_deadline(deadline, "deletion")?;
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    fn check_deadline(&self, deadline: Option<Instant>, what: &str) -> Result<()> {
        match deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ProvisionError::timeout(format!(
                "gave up waiting for cluster {} {what}",
                self.cluster.identifier
            ))),
            _ => Ok(()),
        }
    }

    async fn teardown_cluster(&self) -> StageOutcome {
        let descriptor = match self.provider.describe_cluster(&self.cluster.identifier).await {
            Ok(d) => d,
            Err(e) if e.is_not_found() => {
                info!(cluster = %self.cluster.identifier, "cluster already absent");
                return StageOutcome::completed();
            }
            Err(e) => return StageOutcome::Failed(e),
        };

        if let Err(e) = self.revoke_setup_ingress(&descriptor).await {
            return StageOutcome::Failed(e);
        }

        info!(cluster = %self.cluster.identifier, "submitting cluster deletion");
        if let Err(e) = self.provider.delete_cluster(&self.cluster.identifier).await {
            return StageOutcome::Failed(e);
        }

        match self.wait_until_gone().await {
            Ok(warning) => StageOutcome::Completed { warning },
            Err(e) => StageOutcome::Failed(e),
        }
    }

    /// Close the rule opened during setup, resolved the same way it was
    /// opened: first security group on the cluster's network.
    async fn revoke_setup_ingress(&self, descriptor: &ClusterDescriptor) -> Result<()> {
        let vpc_id = descriptor.vpc_id.as_deref().ok_or_else(|| {
            ProvisionError::provider(format!(
                "cluster {} reported no virtual network",
                self.cluster.identifier
            ))
        })?;
        let group = self.provider.default_security_group(vpc_id).await?;
        let rule = IngressRule::public_warehouse_port(group, self.cluster.port);
        info!(group = %rule.security_group_id, port = rule.port, "revoking ingress");
        self.provider.revoke_ingress(&rule).await
    }

    async fn teardown_role(&self) -> StageOutcome {
        let mut warning = None;

        info!(role = %self.role.name, policy = %self.role.policy_arn, "detaching storage policy");
        match self
            .provider
            .detach_policy(&self.role.name, &self.role.policy_arn)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warning = Some(format!("policy already detached: {e}"));
            }
            Err(e) => return StageOutcome::Failed(e),
        }

        info!(role = %self.role.name, "deleting access role");
        match self.provider.delete_role(&self.role.name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warning.get_or_insert(format!("role already absent: {e}"));
            }
            Err(e) => return StageOutcome::Failed(e),
        }

        StageOutcome::Completed { warning }
    }
}
