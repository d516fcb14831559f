//! Microsoft Graph directory reader for groupcensus.
//!
//! Implements [`groupcensus_core::DirectoryReader`] against Microsoft Entra ID
//! using app-only (client credentials) authentication.
//!
//! # Features
//!
//! - `OAuth2` client credentials with token caching
//! - Mail-enabled group listing with `@odata.nextLink` paging
//! - Transitive member counts via `$count`
//! - Retry-After aware backoff for throttled requests
//! - Multi-cloud support (Commercial, US Government, China, Germany)
//!
//! # Example
//!
//! ```no_run
//! use groupcensus_core::DirectoryReader;
//! use groupcensus_entra::{EntraConfig, EntraDirectory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (config, credentials) = EntraConfig::from_env()?;
//! let directory = EntraDirectory::new(&config, credentials)?;
//! directory.verify_connection().await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod error;
mod graph_client;
mod groups;
mod throttle;

// Re-exports
pub use auth::TokenCache;
pub use config::{
    ConfigError, EntraCloudEnvironment, EntraConfig, EntraCredentials, GRAPH_API_VERSION,
    MAX_PAGE_SIZE,
};
pub use error::{EntraError, EntraResult};
pub use graph_client::{GraphClient, ODataError, ODataErrorBody, ODataResponse};
pub use groups::EntraDirectory;
pub use throttle::ThrottlePolicy;
