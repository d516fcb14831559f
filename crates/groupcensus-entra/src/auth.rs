//! Client credentials token acquisition with an in-memory cache.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{EntraConfig, EntraCredentials, EntraError, EntraResult};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True once the token is inside the refresh window.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Holds the app credentials and the current access token.
#[derive(Debug)]
pub struct TokenCache {
    credentials: EntraCredentials,
    token_url: String,
    scope: String,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl TokenCache {
    /// Creates a token cache for the configured tenant and authority.
    #[must_use]
    pub fn new(
        config: &EntraConfig,
        credentials: EntraCredentials,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                config.login_endpoint(),
                config.tenant_id
            ),
            scope: format!("{}/.default", config.cloud_environment.graph_endpoint()),
            http_client,
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Returns a valid access token, acquiring a new one when needed.
    ///
    /// # Errors
    ///
    /// Returns [`EntraError::Auth`] if the authority rejects the request.
    pub async fn get_token(&self) -> EntraResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(token) = cache.as_ref() {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.acquire_token().await?;
        let access_token = token.access_token.clone();
        *self.cached_token.write().await = Some(token);
        Ok(access_token)
    }

    #[instrument(skip(self))]
    async fn acquire_token(&self) -> EntraResult<CachedToken> {
        use secrecy::ExposeSecret;

        debug!("Requesting access token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose_secret()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| EntraError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EntraError::Auth(format!(
                "token request failed with status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| EntraError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        debug!(expires_at = %expires_at.format("%Y-%m-%d %H:%M:%S UTC"), "Acquired access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_inside_grace_period_is_expired() {
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        };
        assert!(!token.is_expired(Duration::minutes(5)));
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_token_urls_follow_config() {
        let config = EntraConfig::new("tenant-1").with_endpoint("http://localhost:9000/");
        let credentials = EntraCredentials {
            client_id: "app".to_string(),
            client_secret: secrecy::SecretString::from("secret".to_string()),
        };
        let cache = TokenCache::new(&config, credentials, reqwest::Client::new());
        assert_eq!(cache.token_url, "http://localhost:9000/tenant-1/oauth2/v2.0/token");
        assert_eq!(cache.scope, "https://graph.microsoft.com/.default");
    }
}
