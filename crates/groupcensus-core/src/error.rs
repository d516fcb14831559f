//! Error types for the report pipeline.
//!
//! Two channels: [`CensusError`] aborts the whole run, while
//! [`LookupError`] is scoped to a single group and ends up as an
//! error row in the report.

use thiserror::Error;

/// Result type alias using `CensusError`.
pub type CensusResult<T> = Result<T, CensusError>;

/// Errors that abort a census run.
#[derive(Debug, Error)]
pub enum CensusError {
    /// Conflicting or malformed mode selection.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The directory session could not be established or queried.
    #[error("Directory connection failed: {0}")]
    ConnectionFailure(String),

    /// The report artifact could not be written.
    #[error("Failed to write report: {0}")]
    Output(String),
}

impl From<csv::Error> for CensusError {
    fn from(e: csv::Error) -> Self {
        CensusError::Output(e.to_string())
    }
}

impl From<std::io::Error> for CensusError {
    fn from(e: std::io::Error) -> Self {
        CensusError::Output(e.to_string())
    }
}

/// Errors scoped to one group's member-count lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The group record has no usable identifier.
    #[error("Group has no identifier")]
    MissingIdentifier,

    /// The transitive member-count call failed.
    #[error("Member count lookup failed: {0}")]
    LookupFailure(String),
}
