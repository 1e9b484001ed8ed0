//! Lifecycle tests against an in-memory fake provider
//!
//! The fake models the provider's resource records (role, cluster,
//! ingress rules) plus a scripted sequence of statuses so the polling
//! behavior can be observed without a real provider.

use crescendo_provision::{
    ClusterDescriptor, ClusterSpec, ClusterStatus, ClusterType, Endpoint, IngressRule,
    ProvisionError, Provisioner, ResourceProvider, RoleSpec, WaitPolicy,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FAKE_VPC: &str = "vpc-0f00";
const FAKE_GROUP: &str = "sg-0123456789abcdef0";

struct FakeCluster {
    status: ClusterStatus,
    port: u16,
}

#[derive(Default)]
struct State {
    role: Option<String>,
    attached_policies: Vec<String>,
    cluster: Option<FakeCluster>,
    ingress: Vec<IngressRule>,
    /// Statuses reported by successive describes during creation
    pending_statuses: VecDeque<ClusterStatus>,
    /// Describes that still report `deleting` before the cluster is gone
    describes_while_deleting: u32,
    fail_delete_cluster: bool,
    /// Error injected into the first describe after deletion is submitted
    post_delete_describe_error: Option<ProvisionError>,
    describe_calls: u32,
}

#[derive(Clone, Default)]
struct FakeProvider {
    state: Arc<Mutex<State>>,
}

impl FakeProvider {
    fn with_pending_statuses(statuses: Vec<ClusterStatus>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().pending_statuses = statuses.into();
        fake
    }

    fn describe_calls(&self) -> u32 {
        self.state.lock().unwrap().describe_calls
    }

    fn is_pristine(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.role.is_none()
            && state.attached_policies.is_empty()
            && state.cluster.is_none()
            && state.ingress.is_empty()
    }
}

#[async_trait]
impl ResourceProvider for FakeProvider {
    async fn create_role(&self, spec: &RoleSpec) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.role.is_some() {
            return Err(ProvisionError::already_exists(format!("role {}", spec.name)));
        }
        state.role = Some(spec.name.clone());
        Ok(())
    }

    async fn attach_policy(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.role.as_deref() != Some(role_name) {
            return Err(ProvisionError::not_found(format!("role {role_name}")));
        }
        state.attached_policies.push(policy_arn.to_string());
        Ok(())
    }

    async fn role_arn(&self, role_name: &str) -> crescendo_provision::Result<String> {
        let state = self.state.lock().unwrap();
        if state.role.as_deref() != Some(role_name) {
            return Err(ProvisionError::not_found(format!("role {role_name}")));
        }
        Ok(format!("arn:aws:iam::123456789012:role/{role_name}"))
    }

    async fn detach_policy(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.role.as_deref() != Some(role_name) {
            return Err(ProvisionError::not_found(format!("role {role_name}")));
        }
        let before = state.attached_policies.len();
        state.attached_policies.retain(|p| p != policy_arn);
        if state.attached_policies.len() == before {
            return Err(ProvisionError::not_found(format!(
                "policy {policy_arn} not attached to {role_name}"
            )));
        }
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.role.as_deref() != Some(role_name) {
            return Err(ProvisionError::not_found(format!("role {role_name}")));
        }
        if !state.attached_policies.is_empty() {
            return Err(ProvisionError::provider(format!(
                "role {role_name} still has attached policies"
            )));
        }
        state.role = None;
        Ok(())
    }

    async fn create_cluster(
        &self,
        spec: &ClusterSpec,
        _role_arn: &str,
    ) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.cluster.is_some() {
            return Err(ProvisionError::already_exists(format!(
                "cluster {}",
                spec.identifier
            )));
        }
        // With no scripted statuses the cluster is available right away.
        let status = if state.pending_statuses.is_empty() {
            ClusterStatus::Available
        } else {
            ClusterStatus::Creating
        };
        state.cluster = Some(FakeCluster {
            status,
            port: spec.port,
        });
        Ok(())
    }

    async fn describe_cluster(
        &self,
        identifier: &str,
    ) -> crescendo_provision::Result<ClusterDescriptor> {
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;

        if state.cluster.is_none() {
            return Err(ProvisionError::not_found(format!("cluster {identifier}")));
        }

        if let Some(next) = state.pending_statuses.pop_front() {
            state.cluster.as_mut().unwrap().status = next;
        }

        let deleting = state.cluster.as_ref().unwrap().status == ClusterStatus::Deleting;
        if deleting {
            if let Some(err) = state.post_delete_describe_error.take() {
                return Err(err);
            }
            if state.describes_while_deleting == 0 {
                state.cluster = None;
                return Err(ProvisionError::not_found(format!("cluster {identifier}")));
            }
            state.describes_while_deleting -= 1;
        }

        let cluster = state.cluster.as_ref().unwrap();
        let available = cluster.status.is_available();
        Ok(ClusterDescriptor {
            status: cluster.status.clone(),
            endpoint: available.then(|| Endpoint {
                address: "fake.cluster.example.com".to_string(),
                port: cluster.port,
            }),
            vpc_id: Some(FAKE_VPC.to_string()),
        })
    }

    async fn delete_cluster(&self, identifier: &str) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete_cluster {
            return Err(ProvisionError::provider(format!(
                "delete {identifier} rejected"
            )));
        }
        match state.cluster.as_mut() {
            Some(cluster) => {
                cluster.status = ClusterStatus::Deleting;
                Ok(())
            }
            None => Err(ProvisionError::not_found(format!("cluster {identifier}"))),
        }
    }

    async fn default_security_group(&self, _vpc_id: &str) -> crescendo_provision::Result<String> {
        Ok(FAKE_GROUP.to_string())
    }

    async fn authorize_ingress(&self, rule: &IngressRule) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.ingress.contains(rule) {
            return Err(ProvisionError::already_exists(format!(
                "ingress on port {}",
                rule.port
            )));
        }
        state.ingress.push(rule.clone());
        Ok(())
    }

    async fn revoke_ingress(&self, rule: &IngressRule) -> crescendo_provision::Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.ingress.len();
        state.ingress.retain(|r| r != rule);
        if state.ingress.len() == before {
            return Err(ProvisionError::not_found(format!(
                "ingress on port {}",
                rule.port
            )));
        }
        Ok(())
    }
}

fn cluster_spec() -> ClusterSpec {
    ClusterSpec {
        identifier: "dwh-cluster".to_string(),
        cluster_type: ClusterType::MultiNode,
        number_of_nodes: 4,
        node_type: "dc2.large".to_string(),
        db_name: "dwh".to_string(),
        port: 5439,
        master_username: "dwhuser".to_string(),
        master_password: "Passw0rd".to_string(),
        role_name: "dwh-role".to_string(),
    }
}

fn fast_wait() -> WaitPolicy {
    WaitPolicy {
        poll_interval: Duration::from_millis(1),
        max_wait: None,
    }
}

fn provisioner(provider: FakeProvider) -> Provisioner<FakeProvider> {
    Provisioner::new(provider, cluster_spec(), RoleSpec::warehouse_reader("dwh-role"))
        .with_wait_policy(fast_wait())
}

#[tokio::test]
async fn setup_then_teardown_restores_initial_provider_state() {
    let provider = FakeProvider::default();
    provider.state.lock().unwrap().describes_while_deleting = 2;
    let orchestrator = provisioner(provider.clone());

    let report = orchestrator.setup().await.expect("setup");
    assert_eq!(report.endpoint.address, "fake.cluster.example.com");
    assert_eq!(report.endpoint.port, 5439);
    assert!(report.role_arn.ends_with("role/dwh-role"));

    let teardown = orchestrator.teardown().await;
    assert!(teardown.is_clean(), "teardown not clean: {teardown:?}");
    assert!(provider.is_pristine());
}

#[tokio::test]
async fn describe_on_never_created_identifier_is_not_found() {
    let provider = FakeProvider::default();
    let err = provider.describe_cluster("no-such-cluster").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err}");
}

#[tokio::test]
async fn availability_poll_continues_through_transient_statuses() {
    let provider = FakeProvider::with_pending_statuses(vec![
        ClusterStatus::Creating,
        ClusterStatus::Other("modifying".to_string()),
        ClusterStatus::Available,
    ]);
    let orchestrator = provisioner(provider.clone());

    orchestrator.setup().await.expect("setup");
    assert_eq!(provider.describe_calls(), 3);
}

#[tokio::test]
async fn cluster_stage_failure_does_not_prevent_role_stage() {
    let provider = FakeProvider::default();
    let orchestrator = provisioner(provider.clone());
    orchestrator.setup().await.expect("setup");

    provider.state.lock().unwrap().fail_delete_cluster = true;
    let report = orchestrator.teardown().await;

    assert!(report.cluster.is_failed());
    assert!(!report.role.is_failed(), "role stage: {:?}", report.role);
    assert!(provider.state.lock().unwrap().role.is_none());
    assert!(!report.is_clean());
}

#[tokio::test]
async fn deletion_poll_treats_other_errors_as_gone_with_warning() {
    let provider = FakeProvider::default();
    let orchestrator = provisioner(provider.clone());
    orchestrator.setup().await.expect("setup");

    provider.state.lock().unwrap().post_delete_describe_error =
        Some(ProvisionError::throttled("rate exceeded"));
    let report = orchestrator.teardown().await;

    match &report.cluster {
        crescendo_provision::StageOutcome::Completed { warning: Some(w) } => {
            assert!(w.contains("rate exceeded"), "warning: {w}");
        }
        other => panic!("expected completed-with-warning, got {other:?}"),
    }
    assert!(!report.role.is_failed());
}

#[tokio::test]
async fn rerunning_setup_against_residue_signals_already_exists() {
    let provider = FakeProvider::default();
    let orchestrator = provisioner(provider.clone());
    orchestrator.setup().await.expect("first setup");

    let err = orchestrator.setup().await.unwrap_err();
    assert!(
        matches!(err, ProvisionError::AlreadyExists(_)),
        "expected AlreadyExists, got {err}"
    );
}

#[tokio::test]
async fn bounded_wait_times_out_when_cluster_never_becomes_available() {
    let provider = FakeProvider::with_pending_statuses(vec![ClusterStatus::Creating; 64]);
    let orchestrator = Provisioner::new(
        provider,
        cluster_spec(),
        RoleSpec::warehouse_reader("dwh-role"),
    )
    .with_wait_policy(WaitPolicy {
        poll_interval: Duration::from_millis(1),
        max_wait: Some(Duration::from_millis(10)),
    });

    let err = orchestrator.setup().await.unwrap_err();
    assert!(
        matches!(err, ProvisionError::Timeout(_)),
        "expected Timeout, got {err}"
    );
}
