//! Error types for the Graph directory reader.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using `EntraError`.
pub type EntraResult<T> = Result<T, EntraError>;

/// Errors that can occur when talking to Microsoft Graph.
#[derive(Debug, Error)]
pub enum EntraError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `OAuth2` authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Microsoft Graph API error.
    #[error("Graph API error ({status}): {code} - {message}")]
    GraphApi {
        status: u16,
        code: String,
        message: String,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Throttling persisted past the retry budget.
    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// A `$count` response was not a non-negative integer.
    #[error("Invalid count response: {0:?}")]
    InvalidCount(String),
}
