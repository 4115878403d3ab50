//! Constants for the SWIS endpoint, configuration lookup and discovery policy
//!
//! The policy values are the ones every discovery job is started with unless the
//! configuration file overrides them through its `policy` section.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV_VAR: &str = "ORION_DISCOVERY_CONFIG";

/// Configuration file used when the environment variable is not set
pub const DEFAULT_CONFIG_FILE: &str = "orion_discovery.json";

/// Environment variable overriding the configured log level
pub const LOG_LEVEL_ENV_VAR: &str = "ORION_DISCOVERY_LOG";

/// File name of the trace log written to the temp directory
pub const TRACE_LOG_FILE: &str = "orion_discovery.log";

// ============================================================================
// NETWORK CONSTANTS
// ============================================================================

/// Default SWIS JSON API port
pub const DEFAULT_SWIS_PORT: u16 = 17778;

/// Path of the SWIS v3 JSON API below the host
pub const SWIS_JSON_PATH: &str = "/SolarWinds/InformationService/v3/Json";

/// Request timeout in seconds for SWIS calls
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Connection timeout in seconds
pub const CONNECTION_TIMEOUT: u64 = 10;

// ============================================================================
// SWIS ENTITY AND QUERY CONSTANTS
// ============================================================================

/// Namespace of the discovery verbs
pub const DISCOVERY_NAMESPACE: &str = "Orion.Discovery";

/// Credential type stored by Orion for SNMP v1/v2c communities
pub const SNMP_V2_CREDENTIAL_TYPE: &str =
    "SolarWinds.Orion.Core.Models.Credentials.SnmpCredentialsV2";

/// Poller name that always maps to the primary engine
pub const PRIMARY_POLLER_NAME: &str = "primary";

/// Engine id of the platform's primary polling engine
pub const PRIMARY_ENGINE_ID: i64 = 1;

// ============================================================================
// DISCOVERY POLICY DEFAULTS
// ============================================================================

/// WMI retries on the core plugin configuration
pub const WMI_RETRIES_COUNT: u32 = 0;
/// WMI retry interval on the core plugin configuration
pub const WMI_RETRY_INTERVAL_MS: u32 = 1000;

/// Discovery job timeout
pub const JOB_TIMEOUT_SECONDS: u32 = 3600;
/// ICMP search timeout per address
pub const SEARCH_TIMEOUT_MS: u32 = 2000;
/// SNMP request timeout
pub const SNMP_TIMEOUT_MS: u32 = 2000;
/// SNMP retries per address
pub const SNMP_RETRIES: u32 = 4;
/// Interval between repeated discovery runs
pub const REPEAT_INTERVAL_MS: u32 = 1800;
/// SNMP agent port
pub const SNMP_PORT: u16 = 161;
/// Router hops followed beyond the given scope
pub const HOP_COUNT: u32 = 0;
/// Allow nodes already monitored to be discovered again
pub const ALLOW_DUPLICATE_NODES: bool = false;
/// Hide the discovery profile in the web console
pub const IS_HIDDEN: bool = false;
