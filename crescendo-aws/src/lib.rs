//! AWS provider implementation for crescendo
//!
//! Implements the `crescendo-provision` resource port against the real
//! AWS services: IAM for the access role, Redshift for the warehouse
//! cluster and EC2 for the network ingress rule.
//!
//! ```ignore
//! use crescendo_aws::{load_sdk_config, AwsAccess, AwsResourceClient};
//!
//! let sdk_config = load_sdk_config(&AwsAccess {
//!     region: "us-west-2".to_string(),
//!     ..Default::default()
//! })
//! .await;
//! let client = AwsResourceClient::new(&sdk_config);
//! ```

pub mod client;
mod error_codes;
pub mod sdk;

pub use client::AwsResourceClient;
pub use sdk::{load_sdk_config, AwsAccess};

// Re-export the port and error for convenience
pub use crescendo_provision::{ProvisionError, ResourceProvider};
