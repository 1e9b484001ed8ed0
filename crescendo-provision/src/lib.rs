//! Provisioning lifecycle for the crescendo warehouse
//!
//! This crate holds the orchestration core: the resource specifications,
//! the `ResourceProvider` port onto the cloud provider's identity,
//! warehouse-cluster and compute-network services, the lifecycle
//! orchestrator (setup / teardown with polling), and the connection
//! resolver used by the SQL layer.
//!
//! Provider implementations live elsewhere (`crescendo-aws` for the real
//! services); tests run the orchestrator against in-memory fakes.
//!
//! ```ignore
//! use crescendo_provision::{Provisioner, RoleSpec, WaitPolicy};
//!
//! let role = RoleSpec::warehouse_reader("dwh-role");
//! let provisioner = Provisioner::new(provider, cluster_spec, role)
//!     .with_wait_policy(WaitPolicy::default());
//! let report = provisioner.setup().await?;
//! println!("endpoint: {}:{}", report.endpoint.address, report.endpoint.port);
//! ```

pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod types;

pub use error::{ProvisionError, Result};
pub use orchestrator::{Provisioner, SetupReport, StageOutcome, TeardownReport, WaitPolicy};
pub use provider::ResourceProvider;
pub use resolver::ConnectionResolver;
pub use types::{
    ClusterDescriptor, ClusterSpec, ClusterStatus, ClusterType, Endpoint, IngressRule, RoleSpec,
    S3_READ_ONLY_POLICY_ARN,
};
