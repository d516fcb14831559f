//! Connection settings for Microsoft Graph.
//!
//! Settings come from `GROUPCENSUS_*` environment variables. Tests supply
//! their own variable reader instead of mutating the process environment.

use secrecy::SecretString;
use std::env::VarError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Graph API version used for every request.
pub const GRAPH_API_VERSION: &str = "v1.0";

/// Largest page size accepted by the Graph groups endpoint.
pub const MAX_PAGE_SIZE: usize = 999;

/// Microsoft cloud the tenant lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntraCloudEnvironment {
    #[default]
    Commercial,
    UsGovernment,
    China,
    Germany,
}

impl EntraCloudEnvironment {
    /// Azure AD authority host.
    #[must_use]
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Germany => "https://login.microsoftonline.de",
        }
    }

    /// Microsoft Graph host.
    #[must_use]
    pub fn graph_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
        }
    }
}

impl FromStr for EntraCloudEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commercial" | "global" | "public" => Ok(Self::Commercial),
            "usgov" | "us_government" | "gcc-high" | "dod" => Ok(Self::UsGovernment),
            "china" => Ok(Self::China),
            "germany" => Ok(Self::Germany),
            other => Err(format!("unknown cloud environment '{other}'")),
        }
    }
}

impl fmt::Display for EntraCloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Commercial => "commercial",
            Self::UsGovernment => "usgov",
            Self::China => "china",
            Self::Germany => "germany",
        };
        f.write_str(name)
    }
}

/// App registration credentials for the client credentials flow.
#[derive(Debug, Clone)]
pub struct EntraCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Graph connection settings.
#[derive(Debug, Clone)]
pub struct EntraConfig {
    pub tenant_id: String,
    pub cloud_environment: EntraCloudEnvironment,
    /// Overrides the cloud's Graph host.
    pub graph_endpoint: Option<String>,
    /// Overrides the cloud's authority host.
    pub login_endpoint: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries allowed for throttled (429) responses; `0` disables them.
    pub max_throttle_retries: u32,
    /// Page size for group listings.
    pub page_size: usize,
}

impl EntraConfig {
    /// Creates a configuration for a tenant with default settings.
    #[must_use]
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            cloud_environment: EntraCloudEnvironment::default(),
            graph_endpoint: None,
            login_endpoint: None,
            timeout_secs: 30,
            max_throttle_retries: 3,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Points both Graph and login requests at one host.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.login_endpoint = Some(endpoint.clone());
        self.graph_endpoint = Some(endpoint);
        self
    }

    /// Sets the throttle retry budget.
    #[must_use]
    pub fn with_max_throttle_retries(mut self, retries: u32) -> Self {
        self.max_throttle_retries = retries;
        self
    }

    /// Sets the listing page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Effective Graph host, without trailing slash.
    #[must_use]
    pub fn graph_endpoint(&self) -> &str {
        self.graph_endpoint
            .as_deref()
            .unwrap_or(self.cloud_environment.graph_endpoint())
            .trim_end_matches('/')
    }

    /// Effective authority host, without trailing slash.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        self.login_endpoint
            .as_deref()
            .unwrap_or(self.cloud_environment.login_endpoint())
            .trim_end_matches('/')
    }

    /// Base URL for Graph requests, e.g. `https://graph.microsoft.com/v1.0`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.graph_endpoint(), GRAPH_API_VERSION)
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_id.trim().is_empty() {
            return Err(ConfigError::MissingVar("GROUPCENSUS_TENANT_ID".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "GROUPCENSUS_TIMEOUT_SECS".into(),
                "must be greater than 0".into(),
            ));
        }
        for (name, value) in [
            ("GROUPCENSUS_GRAPH_ENDPOINT", &self.graph_endpoint),
            ("GROUPCENSUS_LOGIN_ENDPOINT", &self.login_endpoint),
        ] {
            if let Some(v) = value {
                url::Url::parse(v)
                    .map_err(|e| ConfigError::InvalidValue(name.into(), e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Loads configuration and credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_env() -> Result<(Self, EntraCredentials), ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Loads configuration and credentials from a custom variable reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_reader<F>(reader: F) -> Result<(Self, EntraCredentials), ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let required = |key: &str| {
            reader(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.into()))
        };

        let tenant_id = required("GROUPCENSUS_TENANT_ID")?;
        let client_id = required("GROUPCENSUS_CLIENT_ID")?;
        let client_secret = required("GROUPCENSUS_CLIENT_SECRET")?;

        let cloud_environment = match reader("GROUPCENSUS_CLOUD") {
            Ok(v) => v
                .parse()
                .map_err(|e| ConfigError::InvalidValue("GROUPCENSUS_CLOUD".into(), e))?,
            Err(_) => EntraCloudEnvironment::default(),
        };

        let timeout_secs = reader("GROUPCENSUS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("GROUPCENSUS_TIMEOUT_SECS".into(), e.to_string())
            })?;

        let max_throttle_retries = reader("GROUPCENSUS_MAX_THROTTLE_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidValue("GROUPCENSUS_MAX_THROTTLE_RETRIES".into(), e.to_string())
            })?;

        let config = Self {
            tenant_id,
            cloud_environment,
            graph_endpoint: reader("GROUPCENSUS_GRAPH_ENDPOINT").ok(),
            login_endpoint: reader("GROUPCENSUS_LOGIN_ENDPOINT").ok(),
            timeout_secs,
            max_throttle_retries,
            page_size: MAX_PAGE_SIZE,
        };
        config.validate()?;

        let credentials = EntraCredentials {
            client_id,
            client_secret: SecretString::from(client_secret),
        };

        Ok((config, credentials))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
