//! Local configuration: known platforms, the default platform and policy overrides
//!
//! The configuration is loaded once and handed to the submitter explicitly; nothing
//! in the library reads it from a global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_PATH_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SWIS_PORT,
};
use crate::error::{Error, Result};
use crate::policy::DiscoveryPolicy;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Fallbacks used when a request leaves a field unset
    pub defaults:  Defaults,
    /// Platforms by identifier
    pub platforms: HashMap<String, PlatformConfig>,
    /// Policy overrides for plugin configuration and job start
    pub policy:    DiscoveryPolicy,
    /// Tracing level for the binary (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: Option<String>,
}

/// Request fallbacks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Platform used when a request does not name one
    pub platform: Option<String>,
}

/// Connection settings for one Orion platform
#[derive(Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Host name or address of the SWIS service
    pub host:            String,
    /// SWIS user
    pub user:            String,
    /// SWIS password
    pub password:        String,
    /// SWIS JSON API port
    #[serde(default = "default_swis_port")]
    pub port:            u16,
    /// Verify the server certificate; Orion ships a self-signed one
    #[serde(default)]
    pub verify_tls:      bool,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

const fn default_swis_port() -> u16 {
    DEFAULT_SWIS_PORT
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl DiscoveryConfig {
    /// Load the configuration from `ORION_DISCOVERY_CONFIG`, or from
    /// `orion_discovery.json` in the working directory
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::from_file(&path)
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).change_context(Error::Configuration(
            format!("Failed to read {}", path.display()),
        ))?;

        serde_json::from_str(&contents).change_context(Error::Configuration(format!(
            "Failed to parse {}",
            path.display()
        )))
    }

    /// Resolve the platform a request targets: its own, else the configured default
    pub fn resolve_platform(&self, requested: Option<&str>) -> Result<String> {
        requested
            .or(self.defaults.platform.as_deref())
            .map(ToString::to_string)
            .ok_or_else(|| Report::new(Error::Configuration("No default Orion platform".into())))
    }

    /// Connection settings for a platform identifier
    pub fn platform(&self, platform: &str) -> Result<&PlatformConfig> {
        self.platforms.get(platform).ok_or_else(|| {
            Report::new(Error::Configuration(format!(
                "Platform '{platform}' is not defined in the configuration"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "defaults": { "platform": "prod1" },
        "platforms": {
            "prod1": { "host": "orion.example.net", "user": "admin", "password": "secret" }
        },
        "policy": { "snmp_retries": 2 }
    }"#;

    #[test]
    fn test_from_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write config");

        let config = DiscoveryConfig::from_file(file.path()).expect("config should load");
        let platform = config.platform("prod1").expect("prod1 is defined");

        assert_eq!(platform.host, "orion.example.net");
        assert_eq!(platform.port, 17778);
        assert!(!platform.verify_tls);
        assert_eq!(platform.timeout_seconds, 30);
        assert_eq!(config.policy.snmp_retries, 2);
        assert_eq!(config.policy.snmp_port, 161);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = DiscoveryConfig::from_file(&dir.path().join("absent.json"))
            .expect_err("missing file must fail");

        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[test]
    fn test_resolve_platform_prefers_request() {
        let config: DiscoveryConfig = serde_json::from_str(SAMPLE).expect("sample parses");

        assert_eq!(
            config.resolve_platform(Some("lab")).expect("explicit platform"),
            "lab"
        );
        assert_eq!(config.resolve_platform(None).expect("default platform"), "prod1");
    }

    #[test]
    fn test_resolve_platform_without_default_fails() {
        let err = DiscoveryConfig::default()
            .resolve_platform(None)
            .expect_err("no platform anywhere");

        assert!(matches!(err.current_context(), Error::Configuration(_)));
        assert!(err.current_context().to_string().contains("No default Orion platform"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config: DiscoveryConfig = serde_json::from_str(SAMPLE).expect("sample parses");
        let rendered = format!("{:?}", config.platform("prod1").expect("prod1"));

        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
