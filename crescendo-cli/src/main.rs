mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use config::Settings;
use crescendo_provision::WaitPolicy;
use error::exit_with_error;
use std::time::Duration;

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off"
    //   --verbose → "info" level, honouring RUST_LOG when set
    //   default  → "off" (clean terminal, progress lines only)
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn wait_policy(poll_interval: u64, max_wait: Option<u64>) -> WaitPolicy {
    WaitPolicy {
        poll_interval: Duration::from_secs(poll_interval),
        max_wait: max_wait.map(Duration::from_secs),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        exit_with_error(e);
    }
}

async fn run(cli: Cli) -> error::CliResult<()> {
    let settings = Settings::load(&cli.config, cli.secrets.as_deref())?;

    match cli.command {
        Commands::Setup {
            poll_interval,
            max_wait,
        } => commands::setup::run(&settings, wait_policy(poll_interval, max_wait)).await,

        Commands::Teardown {
            poll_interval,
            max_wait,
        } => commands::teardown::run(&settings, wait_policy(poll_interval, max_wait)).await,

        Commands::Status => commands::status::run(&settings).await,

        Commands::CreateTables => commands::create_tables::run(&settings).await,

        Commands::Etl => commands::etl::run(&settings).await,
    }
}
