//! Caller-facing discovery request

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A discovery job to submit, as supplied by the caller
///
/// Scope fields keep the caller's `None` distinct from an empty list; the
/// builder turns that into the platform's sentinel where the platform needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryRequest {
    /// Name of the discovery profile
    pub name:             String,
    /// Platform identifier; falls back to the configured default
    #[serde(default)]
    pub platform:         Option<String>,
    /// Poller name; falls back to the primary engine
    #[serde(default)]
    pub poller:           Option<String>,
    /// SNMP communities in trial priority order
    pub snmp_communities: Vec<String>,
    /// Individual node addresses
    #[serde(default)]
    pub nodes:            Option<Vec<String>>,
    /// Subnets as `ip/mask`
    #[serde(default)]
    pub subnets:          Option<Vec<String>>,
    /// Address ranges as `start:end`
    #[serde(default)]
    pub ip_ranges:        Option<Vec<String>>,
    /// Disable ICMP-only discovery
    #[serde(default = "default_no_icmp_only")]
    pub no_icmp_only:     bool,
    /// Import discovered nodes automatically
    #[serde(default)]
    pub auto_import:      bool,
}

const fn default_no_icmp_only() -> bool {
    true
}

impl DiscoveryRequest {
    /// Create a request with the required fields and every default applied
    pub fn new(name: impl Into<String>, snmp_communities: Vec<String>) -> Self {
        Self {
            name: name.into(),
            platform: None,
            poller: None,
            snmp_communities,
            nodes: None,
            subnets: None,
            ip_ranges: None,
            no_icmp_only: default_no_icmp_only(),
            auto_import: false,
        }
    }

    /// Target a specific platform
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Run the job on a named poller
    #[must_use]
    pub fn with_poller(mut self, poller: impl Into<String>) -> Self {
        self.poller = Some(poller.into());
        self
    }

    /// Scan individual nodes
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Scan subnets given as `ip/mask`
    #[must_use]
    pub fn with_subnets(mut self, subnets: Vec<String>) -> Self {
        self.subnets = Some(subnets);
        self
    }

    /// Scan ranges given as `start:end`
    #[must_use]
    pub fn with_ip_ranges(mut self, ip_ranges: Vec<String>) -> Self {
        self.ip_ranges = Some(ip_ranges);
        self
    }

    /// Set whether ICMP-only discovery is disabled
    #[must_use]
    pub const fn with_no_icmp_only(mut self, no_icmp_only: bool) -> Self {
        self.no_icmp_only = no_icmp_only;
        self
    }

    /// Set whether discovered nodes are imported automatically
    #[must_use]
    pub const fn with_auto_import(mut self, auto_import: bool) -> Self {
        self.auto_import = auto_import;
        self
    }

    /// Reject requests the platform cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Report::new(Error::missing("discovery name")));
        }
        if self.snmp_communities.is_empty() {
            return Err(Report::new(Error::missing("SNMP community strings"))
                .attach(format!("Discovery: {}", self.name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_applies_defaults() {
        let request: DiscoveryRequest = serde_json::from_value(json!({
            "name": "Lab Net",
            "snmp_communities": ["public"]
        }))
        .expect("minimal request should deserialize");

        assert_eq!(request, DiscoveryRequest::new("Lab Net", vec!["public".into()]));
        assert!(request.no_icmp_only);
        assert!(!request.auto_import);
        assert_eq!(request.nodes, None);
    }

    #[test]
    fn test_explicit_empty_list_is_kept() {
        let request: DiscoveryRequest = serde_json::from_value(json!({
            "name": "Lab Net",
            "snmp_communities": ["public"],
            "nodes": [],
            "no_icmp_only": false
        }))
        .expect("request should deserialize");

        assert_eq!(request.nodes, Some(Vec::new()));
        assert!(!request.no_icmp_only);
    }

    #[test]
    fn test_misspelled_scope_key_is_rejected() {
        let result = serde_json::from_value::<DiscoveryRequest>(json!({
            "name": "Lab Net",
            "snmp_communities": ["public"],
            "subnet": ["10.1.0.0/16"]
        }));

        let err = result.expect_err("unknown field must not be dropped");
        assert!(err.to_string().contains("subnet"));
    }

    #[test]
    fn test_validate() {
        let request = DiscoveryRequest::new("Lab Net", vec!["public".into()]);
        assert!(request.validate().is_ok());

        let err = DiscoveryRequest::new("Lab Net", Vec::new())
            .validate()
            .expect_err("communities are required");
        assert!(matches!(err.current_context(), Error::InvalidRequest(_)));

        let err = DiscoveryRequest::new("  ", vec!["public".into()])
            .validate()
            .expect_err("name is required");
        assert!(matches!(err.current_context(), Error::InvalidRequest(_)));
    }
}
