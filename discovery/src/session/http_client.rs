//! HTTP client for SWIS (SolarWinds Information Service) communication
//!
//! This module owns everything HTTP-related for a session: URL building, basic
//! auth, request sending, status checking and response parsing. Callers see only
//! `query` and `invoke`.

use std::time::Duration;

use error_stack::Report;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::PlatformConfig;
use crate::constants::{CONNECTION_TIMEOUT, SWIS_JSON_PATH};
use crate::error::{Error, Result};

/// HTTP client bound to one platform
pub(super) struct SwisHttpClient {
    platform: String,
    base_url: String,
    user:     String,
    password: String,
    client:   Client,
}

impl SwisHttpClient {
    /// Create a client for `platform` from its connection settings
    pub(super) fn new(platform: &str, config: &PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Report::new(Error::connect_failed(platform, e)))?;

        Ok(Self {
            platform: platform.to_string(),
            base_url: build_base_url(&config.host, config.port),
            user: config.user.clone(),
            password: config.password.clone(),
            client,
        })
    }

    /// Run a SWQL query and return its `results` rows
    pub(super) async fn query(&self, swql: &str, parameters: Value) -> Result<Vec<Value>> {
        let body = build_query_body(swql, parameters);
        let response = self.send("Query", &body).await?;

        if !response.status().is_success() {
            return Err(self.rejected("Query", response).await);
        }

        let mut payload: Value = self.parse_json(response, "Query").await?;
        match payload.get_mut("results").map(Value::take) {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(Report::new(Error::platform_rejected("Query", payload))
                .attach(format!("SWQL: {swql}"))
                .attach("Response has no 'results' array")),
        }
    }

    /// Invoke a verb on an entity; the parameters object is sent as the single argument
    pub(super) async fn invoke(
        &self,
        namespace: &str,
        operation: &str,
        parameters: Value,
    ) -> Result<Value> {
        let path = build_invoke_path(namespace, operation);
        let response = self.send(&path, &Value::Array(vec![parameters])).await?;

        if !response.status().is_success() {
            return Err(self
                .rejected(&format!("{namespace}.{operation}"), response)
                .await);
        }

        self.parse_json(response, &path).await
    }

    /// Build the full URL of a SWIS endpoint
    fn build_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// POST a JSON body to a SWIS endpoint
    async fn send(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let url = self.build_url(path);
        debug!("SWIS request: POST {url} - {body}");

        self.client
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| self.handle_error(e, &url))
    }

    /// Parse a successful response body as JSON
    async fn parse_json(&self, response: reqwest::Response, path: &str) -> Result<Value> {
        match response.json().await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("SWIS {path}: JSON parsing failed - error={e}");
                Err(
                    Report::new(Error::connect_failed(&self.platform, "invalid JSON response"))
                        .attach(format!("Endpoint: {path}"))
                        .attach(format!("Error: {e}")),
                )
            }
        }
    }

    /// Turn a non-success response into a `Platform` error carrying its body
    async fn rejected(&self, operation: &str, response: reqwest::Response) -> Report<Error> {
        let status = response.status();
        warn!("SWIS {operation}: HTTP status error - status={status}");

        let text = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Report::new(Error::platform_rejected(operation, payload)).attach(format!(
            "Platform '{}' returned HTTP {status}: {}",
            self.platform,
            status.canonical_reason().unwrap_or("Unknown error")
        ))
    }

    /// Classify transport failures as connection errors with context
    fn handle_error(&self, e: reqwest::Error, url: &str) -> Report<Error> {
        warn!("SWIS request failed - error={e}");

        let error_type = if e.is_timeout() {
            "Timeout"
        } else if e.is_connect() {
            "Connection failed"
        } else if e.is_request() {
            "Request error"
        } else if e.is_body() {
            "Body error"
        } else if e.is_decode() {
            "Decode error"
        } else {
            "Unknown error type"
        };

        Report::new(Error::connect_failed(
            &self.platform,
            format!("{error_type}: {e}"),
        ))
        .attach(format!("URL: {url}"))
        .attach(format!("Full error: {e:?}"))
    }
}

/// Base URL of the SWIS JSON API on `host:port`
fn build_base_url(host: &str, port: u16) -> String {
    format!("https://{host}:{port}{SWIS_JSON_PATH}")
}

/// Relative path of an invoke call
fn build_invoke_path(namespace: &str, operation: &str) -> String {
    format!("Invoke/{namespace}/{operation}")
}

/// Body of a SWQL query call
fn build_query_body(swql: &str, parameters: Value) -> Value {
    json!({ "query": swql, "parameters": parameters })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform_config() -> PlatformConfig {
        serde_json::from_value(json!({
            "host": "orion.example.net",
            "user": "admin",
            "password": "secret",
            "port": 17774
        }))
        .expect("platform config")
    }

    #[test]
    fn test_urls() {
        let client = SwisHttpClient::new("prod1", &platform_config()).expect("client builds");

        assert_eq!(
            client.build_url("Query"),
            "https://orion.example.net:17774/SolarWinds/InformationService/v3/Json/Query"
        );
        assert_eq!(
            client.build_url(&build_invoke_path("Orion.Discovery", "StartDiscovery")),
            "https://orion.example.net:17774/SolarWinds/InformationService/v3/Json/Invoke/Orion.Discovery/StartDiscovery"
        );
    }

    #[test]
    fn test_query_body() {
        let body = build_query_body("SELECT ID FROM Orion.Credential", json!({"name": "public"}));

        assert_eq!(
            body,
            json!({
                "query": "SELECT ID FROM Orion.Credential",
                "parameters": {"name": "public"}
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let config: PlatformConfig = serde_json::from_value(json!({
            "host": "127.0.0.1",
            "user": "admin",
            "password": "secret",
            "port": 1,
            "timeout_seconds": 2
        }))
        .expect("platform config");
        let client = SwisHttpClient::new("local", &config).expect("client builds");

        let err = client
            .query("SELECT TOP 1 EngineID FROM Orion.Engines", json!({}))
            .await
            .expect_err("nothing listens on port 1");

        assert!(matches!(err.current_context(), Error::Connection(_)));
    }
}
