//! AWS resource client
//!
//! Implements the `ResourceProvider` port against the real identity
//! (IAM), warehouse-cluster (Redshift) and compute-network (EC2)
//! services. The client carries no retry or backoff of its own beyond
//! what the SDK configuration provides; service errors are mapped onto
//! the domain error kinds by provider error code so the orchestrator can
//! tell expected absence/presence signals from true failures.

use crate::error_codes::{ALREADY_EXISTS_CODES, NOT_FOUND_CODES, THROTTLED_CODES};
use async_trait::async_trait;
use aws_sdk_iam::error::{ProvideErrorMetadata, SdkError};
use crescendo_provision::{
    ClusterDescriptor, ClusterSpec, ClusterStatus, ClusterType, Endpoint, IngressRule,
    ProvisionError, ResourceProvider, Result, RoleSpec,
};

/// Client over the three provider services
#[derive(Clone)]
pub struct AwsResourceClient {
    iam: aws_sdk_iam::Client,
    redshift: aws_sdk_redshift::Client,
    ec2: aws_sdk_ec2::Client,
}

impl std::fmt::Debug for AwsResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsResourceClient").finish_non_exhaustive()
    }
}

impl AwsResourceClient {
    /// Build service clients from a shared SDK configuration
    /// (credentials, region and endpoint override come from there).
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            iam: aws_sdk_iam::Client::new(sdk_config),
            redshift: aws_sdk_redshift::Client::new(sdk_config),
            ec2: aws_sdk_ec2::Client::new(sdk_config),
        }
    }

    /// Create from pre-built clients (for testing against local stacks)
    pub fn from_clients(
        iam: aws_sdk_iam::Client,
        redshift: aws_sdk_redshift::Client,
        ec2: aws_sdk_ec2::Client,
    ) -> Self {
        Self { iam, redshift, ec2 }
    }
}

#[async_trait]
impl ResourceProvider for AwsResourceClient {
    async fn create_role(&self, spec: &RoleSpec) -> Result<()> {
        self.iam
            .create_role()
            .path("/")
            .role_name(&spec.name)
            .description("Allows the warehouse service read-only access to object storage")
            .assume_role_policy_document(&spec.trust_policy)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("create role {}", spec.name)))?;
        Ok(())
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.iam
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("attach {policy_arn} to {role_name}")))?;
        Ok(())
    }

    async fn role_arn(&self, role_name: &str) -> Result<String> {
        let output = self
            .iam
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("get role {role_name}")))?;

        output
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| ProvisionError::not_found(format!("role {role_name}")))
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.iam
            .detach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("detach {policy_arn} from {role_name}")))?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.iam
            .delete_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("delete role {role_name}")))?;
        Ok(())
    }

    async fn create_cluster(&self, spec: &ClusterSpec, role_arn: &str) -> Result<()> {
        let mut request = self
            .redshift
            .create_cluster()
            .cluster_identifier(&spec.identifier)
            .cluster_type(spec.cluster_type.as_str())
            .node_type(&spec.node_type)
            .db_name(&spec.db_name)
            .port(i32::from(spec.port))
            .master_username(&spec.master_username)
            .master_user_password(&spec.master_password)
            .iam_roles(role_arn);

        // The provider rejects a node count on single-node clusters.
        if spec.cluster_type == ClusterType::MultiNode {
            request = request.number_of_nodes(spec.number_of_nodes);
        }

        request
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("create cluster {}", spec.identifier)))?;
        Ok(())
    }

    async fn describe_cluster(&self, identifier: &str) -> Result<ClusterDescriptor> {
        let output = self
            .redshift
            .describe_clusters()
            .cluster_identifier(identifier)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("describe cluster {identifier}")))?;

        let cluster = output
            .clusters()
            .first()
            .ok_or_else(|| ProvisionError::not_found(format!("cluster {identifier}")))?;

        let status = cluster
            .cluster_status()
            .map(ClusterStatus::parse)
            .ok_or_else(|| {
                ProvisionError::provider(format!("cluster {identifier} reported no status"))
            })?;

        let endpoint = cluster.endpoint().and_then(|e| {
            let address = e.address()?.to_string();
            let port = e.port().and_then(|p| u16::try_from(p).ok())?;
            Some(Endpoint { address, port })
        });

        Ok(ClusterDescriptor {
            status,
            endpoint,
            vpc_id: cluster.vpc_id().map(str::to_string),
        })
    }

    async fn delete_cluster(&self, identifier: &str) -> Result<()> {
        self.redshift
            .delete_cluster()
            .cluster_identifier(identifier)
            .skip_final_cluster_snapshot(true)
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("delete cluster {identifier}")))?;
        Ok(())
    }

    async fn default_security_group(&self, vpc_id: &str) -> Result<String> {
        let output = self
            .ec2
            .describe_security_groups()
            .filters(
                aws_sdk_ec2::types::Filter::builder()
                    .name("vpc-id")
                    .values(vpc_id)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| map_api_error(e, format!("list security groups of {vpc_id}")))?;

        output
            .security_groups()
            .first()
            .and_then(|group| group.group_id())
            .map(str::to_string)
            .ok_or_else(|| {
                ProvisionError::not_found(format!("no security group found on {vpc_id}"))
            })
    }

    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<()> {
        self.ec2
            .authorize_security_group_ingress()
            .group_id(&rule.security_group_id)
            .ip_protocol(&rule.protocol)
            .from_port(i32::from(rule.port))
            .to_port(i32::from(rule.port))
            .cidr_ip(&rule.cidr)
            .send()
            .await
            .map_err(|e| {
                map_api_error(
                    e,
                    format!("authorize ingress on {}", rule.security_group_id),
                )
            })?;
        Ok(())
    }

    async fn revoke_ingress(&self, rule: &IngressRule) -> Result<()> {
        self.ec2
            .revoke_security_group_ingress()
            .group_id(&rule.security_group_id)
            .ip_protocol(&rule.protocol)
            .from_port(i32::from(rule.port))
            .to_port(i32::from(rule.port))
            .cidr_ip(&rule.cidr)
            .send()
            .await
            .map_err(|e| {
                map_api_error(e, format!("revoke ingress on {}", rule.security_group_id))
            })?;
        Ok(())
    }
}

// Error mapping helpers

/// Map an SDK error onto a domain error kind by provider error code.
fn map_api_error<E>(err: SdkError<E>, what: String) -> ProvisionError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    match err.code() {
        Some(code) => kind_for_code(code, format!("{what}: {}", describe_service_error(&err))),
        None => ProvisionError::provider(format!("{what}: {err:?}")),
    }
}

/// Classify a provider error code into a domain error kind.
fn kind_for_code(code: &str, context: String) -> ProvisionError {
    if NOT_FOUND_CODES.contains(&code) {
        ProvisionError::not_found(context)
    } else if ALREADY_EXISTS_CODES.contains(&code) {
        ProvisionError::already_exists(context)
    } else if THROTTLED_CODES.contains(&code) {
        ProvisionError::throttled(context)
    } else {
        ProvisionError::provider(context)
    }
}

fn describe_service_error<E>(err: &SdkError<E>) -> String
where
    E: ProvideErrorMetadata,
{
    let code = err.code().unwrap_or("unknown");
    match err.message() {
        Some(message) => format!("{code}: {message}"),
        None => code.to_string(),
    }
}
