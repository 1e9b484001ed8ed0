//! Configuration loading
//!
//! One TOML file with `[aws]`, `[cluster]` and `[s3]` sections, plus an
//! optional secrets overlay so credentials can live outside the main
//! file (and outside version control). Everything is read once at
//! startup into an explicit `Settings` value; there is no ambient
//! configuration state.

use crate::error::{CliError, CliResult};
use crescendo_aws::AwsAccess;
use crescendo_etl::{StagingSources, WarehouseDsn};
use crescendo_provision::{ClusterSpec, ClusterType, Endpoint, RoleSpec};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub aws: AwsSettings,
    pub cluster: ClusterSettings,
    pub s3: S3Settings,
}

#[derive(Debug, Deserialize)]
pub struct AwsSettings {
    pub region: String,
    /// Name of the access role created during setup
    pub iam_role: String,
    pub key: Option<String>,
    pub secret: Option<String>,
    /// Endpoint override for local provider stacks
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterSettings {
    pub identifier: String,
    /// "single-node" or "multi-node"
    #[serde(rename = "type")]
    pub cluster_type: String,
    pub num_nodes: i32,
    pub node_type: String,
    pub db_name: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct S3Settings {
    pub log_data: String,
    pub log_jsonpath: String,
    pub song_data: String,
}

/// Partial shape of the secrets overlay file
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    aws: AwsSecrets,
    #[serde(default)]
    cluster: ClusterSecrets,
}

#[derive(Debug, Default, Deserialize)]
struct AwsSecrets {
    key: Option<String>,
    secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ClusterSecrets {
    db_password: Option<String>,
}

impl Settings {
    /// Load the main file and, when present, overlay the secrets file.
    ///
    /// An explicitly passed secrets path must exist; the default
    /// `secrets.toml` next to the config file is optional.
    pub fn load(config_path: &Path, secrets_path: Option<&Path>) -> CliResult<Self> {
        let mut settings = read_settings(config_path)?;

        let default_secrets = config_path.with_file_name("secrets.toml");
        let (path, required) = match secrets_path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_secrets, false),
        };

        if path.exists() {
            let secrets = read_secrets(&path)?;
            settings.apply_secrets(secrets);
        } else if required {
            return Err(CliError::Config(format!(
                "secrets file not found: {}",
                path.display()
            )));
        }

        Ok(settings)
    }

    fn apply_secrets(&mut self, secrets: SecretsFile) {
        if secrets.aws.key.is_some() {
            self.aws.key = secrets.aws.key;
        }
        if secrets.aws.secret.is_some() {
            self.aws.secret = secrets.aws.secret;
        }
        if secrets.cluster.db_password.is_some() {
            self.cluster.db_password = secrets.cluster.db_password;
        }
    }

    pub fn aws_access(&self) -> AwsAccess {
        AwsAccess {
            region: self.aws.region.clone(),
            access_key_id: self.aws.key.clone(),
            secret_access_key: self.aws.secret.clone(),
            endpoint: self.aws.endpoint.clone(),
        }
    }

    pub fn cluster_spec(&self) -> CliResult<ClusterSpec> {
        let cluster_type = ClusterType::parse(&self.cluster.cluster_type).ok_or_else(|| {
            CliError::Config(format!(
                "unknown cluster type '{}' (expected single-node or multi-node)",
                self.cluster.cluster_type
            ))
        })?;
        let master_password = self.db_password()?;

        Ok(ClusterSpec {
            identifier: self.cluster.identifier.clone(),
            cluster_type,
            number_of_nodes: self.cluster.num_nodes,
            node_type: self.cluster.node_type.clone(),
            db_name: self.cluster.db_name.clone(),
            port: self.cluster.db_port,
            master_username: self.cluster.db_user.clone(),
            master_password,
            role_name: self.aws.iam_role.clone(),
        })
    }

    pub fn role_spec(&self) -> RoleSpec {
        RoleSpec::warehouse_reader(&self.aws.iam_role)
    }

    pub fn staging_sources(&self, role_arn: String) -> StagingSources {
        StagingSources {
            role_arn,
            region: self.aws.region.clone(),
            events_uri: self.s3.log_data.clone(),
            events_jsonpath_uri: self.s3.log_jsonpath.clone(),
            songs_uri: self.s3.song_data.clone(),
        }
    }

    pub fn dsn(&self, endpoint: &Endpoint) -> CliResult<WarehouseDsn> {
        Ok(WarehouseDsn {
            host: endpoint.address.clone(),
            port: endpoint.port,
            dbname: self.cluster.db_name.clone(),
            user: self.cluster.db_user.clone(),
            password: self.db_password()?,
        })
    }

    fn db_password(&self) -> CliResult<String> {
        self.cluster.db_password.clone().ok_or_else(|| {
            CliError::Config(
                "cluster.db_password is not set (main config or secrets overlay)".to_string(),
            )
        })
    }
}

fn read_settings(path: &Path) -> CliResult<Settings> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| CliError::Config(format!("cannot parse {}: {e}", path.display())))
}

fn read_secrets(path: &Path) -> CliResult<SecretsFile> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| CliError::Config(format!("cannot parse {}: {e}", path.display())))
}
