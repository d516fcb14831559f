//! CLI error types and exit codes

use groupcensus_core::CensusError;
use groupcensus_entra::ConfigError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success, including runs with nothing to report
/// - 1: Configuration or output error
/// - 2: Invalid arguments
/// - 3: Connection failure
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Could not write report: {0}")]
    Output(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Output(_) => 1,
            CliError::InvalidArguments(_) => 2,
            CliError::ConnectionFailed(_) => 3,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some(
                "Set GROUPCENSUS_TENANT_ID, GROUPCENSUS_CLIENT_ID and GROUPCENSUS_CLIENT_SECRET, or put them in a .env file.",
            ),
            CliError::ConnectionFailed(_) => Some(
                "Check the client secret and that the app registration has Group.Read.All application permission.",
            ),
            CliError::InvalidArguments(_) => Some("Run 'groupcensus --help' for usage."),
            CliError::Output(_) => None,
        }
    }
}

impl From<CensusError> for CliError {
    fn from(err: CensusError) -> Self {
        match err {
            CensusError::InvalidArguments(msg) => CliError::InvalidArguments(msg),
            CensusError::ConnectionFailure(msg) => CliError::ConnectionFailed(msg),
            CensusError::Output(msg) => CliError::Output(msg),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
