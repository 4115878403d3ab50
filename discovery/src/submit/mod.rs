//! Discovery submission orchestrator
//!
//! Sequences one submission:
//! 1. resolve the target platform and validate the request locally
//! 2. connect
//! 3. resolve credentials into the plugin configuration
//! 4. create the plugin configuration
//! 5. resolve the engine
//! 6. start the discovery job against that configuration
//!
//! The steps run strictly in order and nothing is retried. A configuration created
//! in step 4 stays on the platform if step 5 or 6 fails; its reference is logged
//! and attached to the returned error.


use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};
use tracing::{info, warn};

use crate::config::DiscoveryConfig;
use crate::constants::DISCOVERY_NAMESPACE;
use crate::error::{Error, Result};
use crate::policy::{DiscoveryPolicy, SnmpVersion};
use crate::request::DiscoveryRequest;
use crate::scope::{CorePluginConfiguration, NormalizedScope, build_credential_order};
use crate::session::{EngineId, PlatformConnector, PlatformSession};

/// Verbs invoked on the `Orion.Discovery` entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum DiscoveryVerb {
    /// Create the scope and credential plugin configuration
    CreateCorePluginConfiguration,
    /// Start a discovery job
    StartDiscovery,
}

/// Handle of a started discovery job, as returned by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryJobHandle(pub Value);

/// One plugin configuration reference in the job start call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PluginConfigurationRef {
    plugin_configuration_item: Value,
}

/// Parameters of `Orion.Discovery.StartDiscovery`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StartDiscoveryParams {
    name:                   String,
    engine_id:              EngineId,
    job_timeout_seconds:    u32,
    #[serde(rename = "SearchTimeoutMiliseconds")]
    search_timeout_ms:      u32,
    #[serde(rename = "SnmpTimeoutMiliseconds")]
    snmp_timeout_ms:        u32,
    snmp_retries:           u32,
    #[serde(rename = "RepeatIntervalMiliseconds")]
    repeat_interval_ms:     u32,
    snmp_port:              u16,
    hop_count:              u32,
    preferred_snmp_version: SnmpVersion,
    disable_icmp:           bool,
    allow_duplicate_nodes:  bool,
    is_auto_import:         bool,
    is_hidden:              bool,
    plugin_configurations:  Vec<PluginConfigurationRef>,
}

impl StartDiscoveryParams {
    fn new(
        request: &DiscoveryRequest,
        engine_id: EngineId,
        plugin_configuration: Value,
        policy: &DiscoveryPolicy,
    ) -> Self {
        Self {
            name: request.name.clone(),
            engine_id,
            job_timeout_seconds: policy.job_timeout_seconds,
            search_timeout_ms: policy.search_timeout_ms,
            snmp_timeout_ms: policy.snmp_timeout_ms,
            snmp_retries: policy.snmp_retries,
            repeat_interval_ms: policy.repeat_interval_ms,
            snmp_port: policy.snmp_port,
            hop_count: policy.hop_count,
            preferred_snmp_version: policy.preferred_snmp_version,
            disable_icmp: request.no_icmp_only,
            allow_duplicate_nodes: policy.allow_duplicate_nodes,
            is_auto_import: request.auto_import,
            is_hidden: policy.is_hidden,
            plugin_configurations: vec![PluginConfigurationRef {
                plugin_configuration_item: plugin_configuration,
            }],
        }
    }
}

/// Submits discovery requests through a platform connector
pub struct DiscoverySubmitter<C> {
    connector: C,
    config:    DiscoveryConfig,
}

impl<C: PlatformConnector> DiscoverySubmitter<C> {
    /// Create a submitter; `config` supplies the default platform and policy
    pub const fn new(connector: C, config: DiscoveryConfig) -> Self {
        Self { connector, config }
    }

    /// Create the plugin configuration and start the discovery job for `request`
    ///
    /// # Errors
    /// `Configuration`, `InvalidRequest` and `Format` before anything is sent;
    /// `Connection`, `CredentialResolution`, `EngineResolution` or `Platform` from
    /// the platform side.
    pub async fn submit_discovery(&self, request: &DiscoveryRequest) -> Result<DiscoveryJobHandle> {
        let platform = self.config.resolve_platform(request.platform.as_deref())?;
        request.validate()?;
        let scope = NormalizedScope::from_request(request)?;

        let session = self
            .connector
            .connect(&platform)
            .await
            .map_err(|report| report.attach(format!("Platform: {platform}")))?;

        let credentials = build_credential_order(&request.snmp_communities, session.as_ref())
            .await
            .map_err(|report| report.attach(format!("Discovery: {}", request.name)))?;
        let plugin_configuration =
            scope.into_plugin_configuration(credentials, &self.config.policy);

        let configuration_ref =
            create_plugin_configuration(session.as_ref(), &plugin_configuration).await?;

        self.start_discovery(session.as_ref(), request, &platform, configuration_ref)
            .await
    }

    /// Resolve the engine and start the job, reporting an orphaned configuration on failure
    async fn start_discovery(
        &self,
        session: &dyn PlatformSession,
        request: &DiscoveryRequest,
        platform: &str,
        configuration_ref: Value,
    ) -> Result<DiscoveryJobHandle> {
        let engine_id = match resolve_engine(session, request.poller.as_deref()).await {
            Ok(engine_id) => engine_id,
            Err(report) => return Err(orphaned(report, &configuration_ref)),
        };

        info!(
            "Adding '{}' Discovery profile to Orion Platform {platform}",
            request.name
        );

        let params = StartDiscoveryParams::new(
            request,
            engine_id,
            configuration_ref.clone(),
            &self.config.policy,
        );
        match invoke(session, DiscoveryVerb::StartDiscovery, &params).await {
            Ok(result) => Ok(DiscoveryJobHandle(result)),
            Err(report) => Err(orphaned(report, &configuration_ref)),
        }
    }
}

/// Create the plugin configuration and return the platform's reference to it
async fn create_plugin_configuration(
    session: &dyn PlatformSession,
    plugin_configuration: &CorePluginConfiguration,
) -> Result<Value> {
    invoke(
        session,
        DiscoveryVerb::CreateCorePluginConfiguration,
        plugin_configuration,
    )
    .await
}

/// The named poller's engine, or the primary engine when no poller is given
async fn resolve_engine(session: &dyn PlatformSession, poller: Option<&str>) -> Result<EngineId> {
    match poller {
        Some(poller) => session.resolve_engine(poller).await,
        None => Ok(EngineId::PRIMARY),
    }
}

/// Serialize `params` and invoke `verb` on the discovery entity
async fn invoke<P: Serialize + Sync>(
    session: &dyn PlatformSession,
    verb: DiscoveryVerb,
    params: &P,
) -> Result<Value> {
    let parameters = serde_json::to_value(params).change_context(Error::InvalidRequest(
        format!("Failed to serialize {verb} parameters"),
    ))?;

    session
        .invoke(DISCOVERY_NAMESPACE, verb.as_ref(), parameters)
        .await
        .map_err(|report| report.attach(format!("Verb: {DISCOVERY_NAMESPACE}.{verb}")))
}

/// Note the plugin configuration left behind by a failed job start
fn orphaned(report: Report<Error>, configuration_ref: &Value) -> Report<Error> {
    warn!("Discovery plugin configuration {configuration_ref} was created but no job was started");
    report.attach(format!(
        "Orphaned plugin configuration left on the platform: {configuration_ref}"
    ))
}
