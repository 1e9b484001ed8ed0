use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
#[allow(dead_code)]
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Configuration file issues.
    Config(String),
    /// Argument / usage errors.
    Usage(String),
    /// Error from the provisioning layer.
    Provision(crescendo_provision::ProvisionError),
    /// Error from the ETL layer.
    Etl(crescendo_etl::EtlError),
    /// One or more teardown stages failed.
    Teardown(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Provision(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Etl(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Teardown(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<crescendo_provision::ProvisionError> for CliError {
    fn from(e: crescendo_provision::ProvisionError) -> Self {
        CliError::Provision(e)
    }
}

impl From<crescendo_etl::EtlError> for CliError {
    fn from(e: crescendo_etl::EtlError) -> Self {
        CliError::Etl(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
