//! Timing, retry and SNMP settings applied to every discovery job
//!
//! These are fixed policy rather than per-request inputs. They are collected in
//! one structure so they can be audited, and overridden from the configuration
//! file, without touching the submission sequence.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::constants::{
    ALLOW_DUPLICATE_NODES, HOP_COUNT, IS_HIDDEN, JOB_TIMEOUT_SECONDS, REPEAT_INTERVAL_MS,
    SEARCH_TIMEOUT_MS, SNMP_PORT, SNMP_RETRIES, SNMP_TIMEOUT_MS, WMI_RETRIES_COUNT,
    WMI_RETRY_INTERVAL_MS,
};

/// SNMP protocol version the platform should try first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum SnmpVersion {
    /// SNMP v1
    #[serde(rename = "SNMP1")]
    #[strum(serialize = "SNMP1")]
    V1,
    /// SNMP v2c
    #[default]
    #[serde(rename = "SNMP2c")]
    #[strum(serialize = "SNMP2c")]
    V2c,
    /// SNMP v3
    #[serde(rename = "SNMP3")]
    #[strum(serialize = "SNMP3")]
    V3,
}

/// Policy values sent with the plugin configuration and the job start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryPolicy {
    /// `WmiRetriesCount` on the core plugin configuration
    pub wmi_retries_count:      u32,
    /// `WmiRetryIntervalMiliseconds` on the core plugin configuration
    pub wmi_retry_interval_ms:  u32,
    /// `JobTimeoutSeconds`
    pub job_timeout_seconds:    u32,
    /// `SearchTimeoutMiliseconds`
    pub search_timeout_ms:      u32,
    /// `SnmpTimeoutMiliseconds`
    pub snmp_timeout_ms:        u32,
    /// `SnmpRetries`
    pub snmp_retries:           u32,
    /// `RepeatIntervalMiliseconds`
    pub repeat_interval_ms:     u32,
    /// `SnmpPort`
    pub snmp_port:              u16,
    /// `HopCount`
    pub hop_count:              u32,
    /// `PreferredSnmpVersion`
    pub preferred_snmp_version: SnmpVersion,
    /// `AllowDuplicateNodes`
    pub allow_duplicate_nodes:  bool,
    /// `IsHidden`
    pub is_hidden:              bool,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            wmi_retries_count:      WMI_RETRIES_COUNT,
            wmi_retry_interval_ms:  WMI_RETRY_INTERVAL_MS,
            job_timeout_seconds:    JOB_TIMEOUT_SECONDS,
            search_timeout_ms:      SEARCH_TIMEOUT_MS,
            snmp_timeout_ms:        SNMP_TIMEOUT_MS,
            snmp_retries:           SNMP_RETRIES,
            repeat_interval_ms:     REPEAT_INTERVAL_MS,
            snmp_port:              SNMP_PORT,
            hop_count:              HOP_COUNT,
            preferred_snmp_version: SnmpVersion::default(),
            allow_duplicate_nodes:  ALLOW_DUPLICATE_NODES,
            is_hidden:              IS_HIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_policy_matches_platform_defaults() {
        let policy = DiscoveryPolicy::default();
        assert_eq!(policy.wmi_retries_count, 0);
        assert_eq!(policy.wmi_retry_interval_ms, 1000);
        assert_eq!(policy.job_timeout_seconds, 3600);
        assert_eq!(policy.search_timeout_ms, 2000);
        assert_eq!(policy.snmp_timeout_ms, 2000);
        assert_eq!(policy.snmp_retries, 4);
        assert_eq!(policy.repeat_interval_ms, 1800);
        assert_eq!(policy.snmp_port, 161);
        assert_eq!(policy.hop_count, 0);
        assert_eq!(policy.preferred_snmp_version, SnmpVersion::V2c);
        assert!(!policy.allow_duplicate_nodes);
        assert!(!policy.is_hidden);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let policy: DiscoveryPolicy =
            serde_json::from_value(json!({"snmp_retries": 2, "preferred_snmp_version": "SNMP3"}))
                .expect("partial policy should deserialize");

        assert_eq!(policy.snmp_retries, 2);
        assert_eq!(policy.preferred_snmp_version, SnmpVersion::V3);
        assert_eq!(policy.job_timeout_seconds, 3600);
    }

    #[test]
    fn test_snmp_version_wire_names() {
        assert_eq!(SnmpVersion::V2c.to_string(), "SNMP2c");
        assert_eq!(SnmpVersion::from_str("SNMP1"), Ok(SnmpVersion::V1));
        assert_eq!(json!(SnmpVersion::V2c), json!("SNMP2c"));
    }
}
