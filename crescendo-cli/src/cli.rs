use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crescendo", about = "Warehouse provisioning and ETL CLI", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = "crescendo.toml")]
    pub config: PathBuf,

    /// Path to an optional secrets overlay file
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision the access role, the cluster and its network ingress
    Setup {
        /// Seconds between availability probes
        #[arg(long, default_value_t = 5)]
        poll_interval: u64,

        /// Bound in seconds on each wait; omit for unbounded
        #[arg(long)]
        max_wait: Option<u64>,
    },

    /// Tear down the cluster, its ingress rule and the access role
    Teardown {
        /// Seconds between deletion probes
        #[arg(long, default_value_t = 5)]
        poll_interval: u64,

        /// Bound in seconds on each wait; omit for unbounded
        #[arg(long)]
        max_wait: Option<u64>,
    },

    /// Show the cluster's current status and endpoint
    Status,

    /// Drop and recreate all warehouse tables
    CreateTables,

    /// Load the staging tables and populate the star schema
    Etl,
}
