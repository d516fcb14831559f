//! Common test utilities for groupcensus-entra integration tests.

#![allow(dead_code)]

use groupcensus_entra::{EntraConfig, EntraCredentials, EntraDirectory, GraphClient, ThrottlePolicy};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";

/// Test data factory for a distribution list.
pub fn create_dl_group(id: &str, name: &str, smtp: &str) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "mail": smtp,
        "proxyAddresses": [format!("smtp:alias-{smtp}"), format!("SMTP:{smtp}")],
        "groupTypes": []
    })
}

/// Test data factory for a Microsoft 365 group.
pub fn create_m365_group(id: &str, name: &str, smtp: &str) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "mail": smtp,
        "proxyAddresses": [format!("SMTP:{smtp}")],
        "groupTypes": ["Unified"]
    })
}

/// Wraps items in an OData response format.
pub fn create_odata_response(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Creates a mock OAuth token response.
pub fn create_token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Mock server wrapper with common setup helpers.
pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Configuration pointing login and Graph at this server.
    pub fn config(&self) -> EntraConfig {
        EntraConfig::new(TENANT_ID).with_endpoint(self.url())
    }

    pub fn credentials() -> EntraCredentials {
        EntraCredentials {
            client_id: "test-client".to_string(),
            client_secret: secrecy::SecretString::from("test-secret".to_string()),
        }
    }

    /// Directory reader with short throttle delays.
    pub fn directory(&self) -> EntraDirectory {
        self.directory_with(self.config(), ThrottlePolicy::for_testing())
    }

    pub fn directory_with(&self, config: EntraConfig, throttle: ThrottlePolicy) -> EntraDirectory {
        let client = GraphClient::new(&config, Self::credentials())
            .unwrap()
            .with_throttle_policy(throttle);
        EntraDirectory::with_client(client, config.page_size)
    }

    /// Sets up the OAuth token endpoint.
    pub async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_token_response("mock-access-token", 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Serves `pages` as a nextLink chain on `/v1.0/groups`.
    ///
    /// The first page answers the initial `$count=true` query; later pages
    /// answer `$skiptoken=pageN`.
    pub async fn mock_group_pages(&self, pages: Vec<Vec<Value>>) {
        let total = pages.len();
        for (i, page) in pages.into_iter().enumerate() {
            let next_link = (i + 1 < total)
                .then(|| format!("{}/v1.0/groups?$skiptoken=page{}", self.url(), i + 1));
            let response = create_odata_response(page, next_link.as_deref());

            let mock = if i == 0 {
                Mock::given(method("GET"))
                    .and(path("/v1.0/groups"))
                    .and(query_param("$count", "true"))
            } else {
                Mock::given(method("GET"))
                    .and(path("/v1.0/groups"))
                    .and(query_param("$skiptoken", format!("page{i}")))
            };
            mock.respond_with(ResponseTemplate::new(200).set_body_json(response))
                .mount(&self.server)
                .await;
        }
    }

    /// Serves a `$count` body for a group.
    pub async fn mock_member_count(&self, group_id: &str, count: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/groups/{group_id}/transitiveMembers/$count")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(count.to_string())
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&self.server)
            .await;
    }

    /// Serves an OData error for a group's `$count`.
    pub async fn mock_member_count_error(&self, group_id: &str, status: u16, code: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/groups/{group_id}/transitiveMembers/$count")))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(create_odata_error(code, "lookup failed")),
            )
            .mount(&self.server)
            .await;
    }
}
