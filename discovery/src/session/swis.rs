//! SWIS-backed platform session

use async_trait::async_trait;
use error_stack::{Report, ResultExt};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::http_client::SwisHttpClient;
use super::types::{CredentialId, EngineId};
use super::{PlatformConnector, PlatformSession};
use crate::config::DiscoveryConfig;
use crate::constants::{PRIMARY_POLLER_NAME, SNMP_V2_CREDENTIAL_TYPE};
use crate::error::{Error, Result};

const PROBE_QUERY: &str = "SELECT TOP 1 EngineID FROM Orion.Engines";

const CREDENTIAL_QUERY: &str =
    "SELECT ID FROM Orion.Credential WHERE CredentialType = @credtype AND Name = @name";

const ENGINE_QUERY: &str =
    "SELECT EngineID, ServerName, IP, ServerType FROM Orion.Engines WHERE ServerName = @poller";

/// Opens [`SwisSession`]s for the platforms defined in the configuration
pub struct SwisConnector {
    config: DiscoveryConfig,
}

impl SwisConnector {
    /// Create a connector over the configured platforms
    pub const fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PlatformConnector for SwisConnector {
    async fn connect(&self, platform: &str) -> Result<Box<dyn PlatformSession>> {
        let settings = self.config.platform(platform)?;

        info!("Connecting to Orion platform: {platform} ({})", settings.host);
        let client = SwisHttpClient::new(platform, settings)?;

        // The client is lazy; probe so an unreachable platform fails here
        client
            .query(PROBE_QUERY, json!({}))
            .await
            .change_context(Error::connect_failed(platform, "probe query failed"))?;

        Ok(Box::new(SwisSession { client }))
    }
}

/// A session against one SWIS endpoint
pub struct SwisSession {
    client: SwisHttpClient,
}

#[async_trait]
impl PlatformSession for SwisSession {
    async fn resolve_credential(&self, community: &str) -> Result<CredentialId> {
        let rows = self
            .client
            .query(
                CREDENTIAL_QUERY,
                json!({ "credtype": SNMP_V2_CREDENTIAL_TYPE, "name": community }),
            )
            .await
            .change_context(Error::unknown_community(community, "lookup failed"))?;

        let id = single_id(&rows, "ID").ok_or_else(|| {
            Report::new(Error::unknown_community(
                community,
                format!("expected one Orion.Credential match, found {}", rows.len()),
            ))
        })?;
        debug!("SNMP community '{community}' resolved to credential {id}");
        Ok(CredentialId(id))
    }

    async fn resolve_engine(&self, poller: &str) -> Result<EngineId> {
        if poller == PRIMARY_POLLER_NAME {
            return Ok(EngineId::PRIMARY);
        }

        let rows = self
            .client
            .query(ENGINE_QUERY, json!({ "poller": poller }))
            .await
            .change_context(Error::unknown_poller(poller, "lookup failed"))?;

        let id = single_id(&rows, "EngineID").ok_or_else(|| {
            Report::new(Error::unknown_poller(
                poller,
                format!("expected one Orion.Engines match, found {}", rows.len()),
            ))
        })?;
        debug!("Poller '{poller}' resolved to engine {id}");
        Ok(EngineId(id))
    }

    async fn invoke(&self, namespace: &str, operation: &str, parameters: Value) -> Result<Value> {
        self.client.invoke(namespace, operation, parameters).await
    }
}

/// The integer `field` of the only row, if there is exactly one
fn single_id(rows: &[Value], field: &str) -> Option<i64> {
    match rows {
        [row] => row.get(field).and_then(Value::as_i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;

    #[test]
    fn test_single_id_requires_exactly_one_row() {
        assert_eq!(single_id(&[json!({"ID": 7})], "ID"), Some(7));
        assert_eq!(single_id(&[], "ID"), None);
        assert_eq!(single_id(&[json!({"ID": 7}), json!({"ID": 8})], "ID"), None);
        assert_eq!(single_id(&[json!({"ID": "7"})], "ID"), None);
    }

    #[tokio::test]
    async fn test_connect_unknown_platform_is_configuration_error() {
        let connector = SwisConnector::new(DiscoveryConfig::default());

        let Err(err) = connector.connect("missing").await else {
            panic!("unknown platform must not connect");
        };
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_primary_poller_skips_lookup() {
        let settings: PlatformConfig = serde_json::from_value(json!({
            "host": "127.0.0.1",
            "user": "admin",
            "password": "secret",
            "port": 1
        }))
        .expect("platform config");
        let session = SwisSession {
            client: SwisHttpClient::new("local", &settings).expect("client builds"),
        };

        let engine = session
            .resolve_engine("primary")
            .await
            .expect("primary never queries");
        assert_eq!(engine, EngineId::PRIMARY);
    }
}
