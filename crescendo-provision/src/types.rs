//! Resource specifications and provider-observed state
//!
//! `ClusterSpec` and `RoleSpec` are read-only inputs built from
//! configuration. `ClusterStatus`, `ClusterDescriptor` and ingress rules
//! are owned by the remote provider and only observed through the
//! `ResourceProvider` port, never cached beyond a single call.

use serde_json::json;

/// Managed policy granting read-only access to object storage
pub const S3_READ_ONLY_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess";

/// Service principal allowed to assume the warehouse role
const WAREHOUSE_SERVICE_PRINCIPAL: &str = "redshift.amazonaws.com";

/// Cluster topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterType {
    SingleNode,
    MultiNode,
}

impl ClusterType {
    /// Provider wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleNode => "single-node",
            Self::MultiNode => "multi-node",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single-node" => Some(Self::SingleNode),
            "multi-node" => Some(Self::MultiNode),
            _ => None,
        }
    }
}

/// Warehouse cluster specification
///
/// Immutable once submitted; supplied entirely from configuration.
#[derive(Debug, Clone)]
pub struct ClusterSpec {
    /// Cluster identifier, unique within the account/region
    pub identifier: String,
    pub cluster_type: ClusterType,
    /// Node count; the provider ignores it for single-node clusters
    pub number_of_nodes: i32,
    pub node_type: String,
    pub db_name: String,
    pub port: u16,
    pub master_username: String,
    pub master_password: String,
    /// Name of the role the cluster assumes for object-storage reads
    pub role_name: String,
}

/// Access-role specification
#[derive(Debug, Clone)]
pub struct RoleSpec {
    /// Role name, unique within the account
    pub name: String,
    /// Trust-policy document declaring which service may assume the role
    pub trust_policy: String,
    /// Managed permission policy attached during setup
    pub policy_arn: String,
}

impl RoleSpec {
    /// Role the warehouse service assumes for read-only object-storage access
    pub fn warehouse_reader(name: impl Into<String>) -> Self {
        let trust_policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Action": "sts:AssumeRole",
                "Effect": "Allow",
                "Principal": { "Service": WAREHOUSE_SERVICE_PRINCIPAL }
            }]
        })
        .to_string();

        Self {
            name: name.into(),
            trust_policy,
            policy_arn: S3_READ_ONLY_POLICY_ARN.to_string(),
        }
    }
}

/// Provider-reported cluster status
///
/// Absence is signalled by `describe_cluster` returning `NotFound`, never
/// by a status value. Transient statuses the provider may report beyond
/// the lifecycle set (e.g. `modifying`) are kept as `Other` so polling
/// can continue through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterStatus {
    Creating,
    Available,
    Deleting,
    Other(String),
}

impl ClusterStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "deleting" => Self::Deleting,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Deleting => "deleting",
            Self::Other(s) => s,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network endpoint of an available cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

/// Snapshot of a cluster as reported by `describe_cluster`
#[derive(Debug, Clone)]
pub struct ClusterDescriptor {
    pub status: ClusterStatus,
    /// Present only once the cluster is available
    pub endpoint: Option<Endpoint>,
    /// Virtual-network reference used for the ingress lookup
    pub vpc_id: Option<String>,
}

/// Network firewall rule for the cluster's database port
///
/// At most one such rule should exist for the port at any time; the
/// design assumes a single default security group per virtual network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub security_group_id: String,
    pub protocol: String,
    pub port: u16,
    pub cidr: String,
}

impl IngressRule {
    /// Public TCP ingress on the warehouse port.
    ///
    /// The unrestricted 0.0.0.0/0 source range is a trust decision
    /// specific to this deployment's threat model, not a general
    /// recommendation.
    pub fn public_warehouse_port(security_group_id: impl Into<String>, port: u16) -> Self {
        Self {
            security_group_id: security_group_id.into(),
            protocol: "tcp".to_string(),
            port,
            cidr: "0.0.0.0/0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_type_round_trip() {
        assert_eq!(ClusterType::parse("single-node"), Some(ClusterType::SingleNode));
        assert_eq!(ClusterType::parse("multi-node"), Some(ClusterType::MultiNode));
        assert_eq!(ClusterType::parse("dual-node"), None);
        assert_eq!(ClusterType::MultiNode.as_str(), "multi-node");
    }

    #[test]
    fn status_parse_keeps_unknown_values() {
        assert_eq!(ClusterStatus::parse("available"), ClusterStatus::Available);
        assert_eq!(ClusterStatus::parse("creating"), ClusterStatus::Creating);
        assert_eq!(
            ClusterStatus::parse("modifying"),
            ClusterStatus::Other("modifying".to_string())
        );
        assert!(!ClusterStatus::parse("modifying").is_available());
    }

    #[test]
    fn warehouse_reader_trust_policy_names_the_service() {
        let role = RoleSpec::warehouse_reader("dwh-role");
        let doc: serde_json::Value = serde_json::from_str(&role.trust_policy).unwrap();
        assert_eq!(
            doc["Statement"][0]["Principal"]["Service"],
            WAREHOUSE_SERVICE_PRINCIPAL
        );
        assert_eq!(doc["Statement"][0]["Action"], "sts:AssumeRole");
        assert_eq!(role.policy_arn, S3_READ_ONLY_POLICY_ARN);
    }

    #[test]
    fn public_ingress_rule_shape() {
        let rule = IngressRule::public_warehouse_port("sg-123", 5439);
        assert_eq!(rule.protocol, "tcp");
        assert_eq!(rule.cidr, "0.0.0.0/0");
        assert_eq!(rule.port, 5439);
    }
}
