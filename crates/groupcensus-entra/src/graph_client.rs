//! Microsoft Graph HTTP client with pagination and throttle handling.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::ops::ControlFlow;
use tracing::{debug, instrument, warn};

use crate::throttle::ThrottlePolicy;
use crate::{EntraConfig, EntraCredentials, EntraError, EntraResult, TokenCache};

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// One page of a collection response.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: TokenCache,
    base_url: String,
    throttle: ThrottlePolicy,
}

impl GraphClient {
    /// Creates a client for the configured tenant and cloud.
    ///
    /// # Errors
    ///
    /// Returns [`EntraError::Config`] if the configuration is unusable, or an
    /// error if the HTTP client cannot be built.
    pub fn new(config: &EntraConfig, credentials: EntraCredentials) -> EntraResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            token_cache: TokenCache::new(config, credentials, http_client.clone()),
            http_client,
            base_url: config.base_url(),
            throttle: ThrottlePolicy::with_max_retries(config.max_throttle_retries),
        })
    }

    /// Replaces the throttle policy.
    #[must_use]
    pub fn with_throttle_policy(mut self, throttle: ThrottlePolicy) -> Self {
        self.throttle = throttle;
        self
    }

    /// Base URL for Graph requests, including the API version.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Acquires a token to prove the credentials are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EntraError::Auth`] when the authority rejects the credentials.
    pub async fn authenticate(&self) -> EntraResult<()> {
        self.token_cache.get_token().await.map(|_| ())
    }

    /// GETs a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> EntraResult<T> {
        let body = self.send(url).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(EntraError::from)
    }

    /// GETs a plain-text resource such as a `$count` segment.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> EntraResult<String> {
        Ok(self.send(url).await?.text().await?)
    }

    async fn send(&self, url: &str) -> EntraResult<reqwest::Response> {
        let mut throttled = 0u32;

        loop {
            let token = self.token_cache.get_token().await?;

            let response = self
                .http_client
                .get(url)
                .bearer_auth(&token)
                .header("ConsistencyLevel", "eventual")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if !self.throttle.allows_retry(throttled) {
                    return Err(EntraError::RateLimited {
                        attempts: throttled + 1,
                    });
                }
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(ThrottlePolicy::parse_retry_after);
                let delay = self.throttle.delay_for(throttled, retry_after);
                throttled += 1;
                warn!(
                    retry = throttled,
                    max_retries = self.throttle.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Throttled by Graph, backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if status.is_success() {
                return Ok(response);
            }

            let error_body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ODataError>(&error_body) {
                Ok(odata) => EntraError::GraphApi {
                    status: status.as_u16(),
                    code: odata.error.code,
                    message: odata.error.message,
                },
                Err(_) => EntraError::GraphApi {
                    status: status.as_u16(),
                    code: status.to_string(),
                    message: error_body,
                },
            });
        }
    }

    /// Walks `@odata.nextLink` pages, handing each page to `callback`.
    ///
    /// Paging stops early when the callback returns [`ControlFlow::Break`].
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page request.
    #[instrument(skip(self, callback))]
    pub async fn get_paginated<T, F>(&self, initial_url: &str, mut callback: F) -> EntraResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>) -> ControlFlow<()>,
    {
        let mut url = initial_url.to_string();
        let mut page = 0usize;

        loop {
            page += 1;
            debug!(page, url = %url, "Fetching page");
            let response: ODataResponse<T> = self.get(&url).await?;

            if callback(response.value).is_break() {
                debug!(page, "Stopped paging early");
                return Ok(());
            }

            match response.next_link {
                Some(next) => url = next,
                None => return Ok(()),
            }
        }
    }
}
