//! Discovery request builder
//!
//! Turns the caller's loosely typed scope and community lists into the structures
//! `Orion.Discovery.CreateCorePluginConfiguration` expects. Everything here is
//! deterministic except credential resolution, which goes through the session.
//!
//! The platform distinguishes an omitted list from an empty one for nodes and
//! subnets (`null` vs `[]`) but always expects a list for IP ranges. Getting this
//! wrong changes what the remote discovery scans, so [`ScopeList`] keeps the
//! distinction explicit.

use error_stack::Report;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::policy::DiscoveryPolicy;
use crate::request::DiscoveryRequest;
use crate::session::{CredentialId, PlatformSession};

/// A scope list the platform can receive as absent (`null`) or present (`[..]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeList<T> {
    /// Field omitted; serializes as the platform's `null` sentinel
    Absent,
    /// Field present, possibly empty
    Present(Vec<T>),
}

impl<T> ScopeList<T> {
    /// Entries when present
    pub fn entries(&self) -> Option<&[T]> {
        match self {
            Self::Absent => None,
            Self::Present(entries) => Some(entries),
        }
    }
}

impl<T: Serialize> Serialize for ScopeList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(entries) => entries.serialize(serializer),
        }
    }
}

/// A single node address in the bulk list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAddress {
    /// Address passed through verbatim
    #[serde(rename = "Address")]
    pub address: String,
}

/// An inclusive address range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpRange {
    /// First address
    #[serde(rename = "StartAddress")]
    pub start: String,
    /// Last address
    #[serde(rename = "EndAddress")]
    pub end:   String,
}

/// A subnet as address and mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    /// Network address
    #[serde(rename = "SubnetIP")]
    pub ip:   String,
    /// Mask, either prefix length or dotted form, as given
    #[serde(rename = "SubnetMask")]
    pub mask: String,
}

/// A credential and its 1-based trial priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialOrderEntry {
    /// Resolved credential
    #[serde(rename = "CredentialID")]
    pub credential_id: CredentialId,
    /// Position in the caller's community list, starting at 1
    #[serde(rename = "Order")]
    pub order:         u32,
}

/// Parameters of `Orion.Discovery.CreateCorePluginConfiguration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorePluginConfiguration {
    /// Individual nodes, or `null`
    pub bulk_list:             ScopeList<BulkAddress>,
    /// Address ranges, always a list
    pub ip_ranges:             Vec<IpRange>,
    /// Subnets, or `null`
    pub subnets:               ScopeList<Subnet>,
    /// Credentials in trial order
    pub credentials:           Vec<CredentialOrderEntry>,
    /// WMI retry count
    pub wmi_retries_count:     u32,
    /// WMI retry interval; the platform spells it with one `l`
    #[serde(rename = "WmiRetryIntervalMiliseconds")]
    pub wmi_retry_interval_ms: u32,
}

/// Nodes as address records, or [`ScopeList::Absent`] when none were given
pub fn normalize_nodes(nodes: Option<&[String]>) -> ScopeList<BulkAddress> {
    nodes.map_or(ScopeList::Absent, |nodes| {
        ScopeList::Present(
            nodes
                .iter()
                .map(|address| BulkAddress {
                    address: address.clone(),
                })
                .collect(),
        )
    })
}

/// `start:end` entries as ranges; an absent list is an empty list
pub fn normalize_ip_ranges(ip_ranges: Option<&[String]>) -> Result<Vec<IpRange>> {
    ip_ranges
        .unwrap_or_default()
        .iter()
        .map(|entry| {
            split_pair(entry, ':', "ip_ranges", "'start:end'")
                .map(|(start, end)| IpRange { start, end })
        })
        .collect()
}

/// `ip/mask` entries as subnets, or [`ScopeList::Absent`] when none were given
pub fn normalize_subnets(subnets: Option<&[String]>) -> Result<ScopeList<Subnet>> {
    let Some(subnets) = subnets else {
        return Ok(ScopeList::Absent);
    };

    subnets
        .iter()
        .map(|entry| {
            split_pair(entry, '/', "subnets", "'ip/mask'").map(|(ip, mask)| Subnet { ip, mask })
        })
        .collect::<Result<Vec<_>>>()
        .map(ScopeList::Present)
}

/// Resolve each community in order and rank it by position
///
/// Stops at the first community that does not resolve; nothing partial is returned.
pub async fn build_credential_order<S>(
    snmp_communities: &[String],
    session: &S,
) -> Result<Vec<CredentialOrderEntry>>
where
    S: PlatformSession + ?Sized,
{
    let mut entries = Vec::with_capacity(snmp_communities.len());

    for (order, community) in (1_u32..).zip(snmp_communities) {
        let credential_id = session
            .resolve_credential(community)
            .await
            .map_err(|report| match report.current_context() {
                Error::CredentialResolution(_) => report,
                _ => report.change_context(Error::unknown_community(community, "lookup failed")),
            })?;
        entries.push(CredentialOrderEntry {
            credential_id,
            order,
        });
    }

    debug!("Credential order: {entries:?}");
    Ok(entries)
}

/// Scope lists that need no session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedScope {
    /// Individual nodes
    pub bulk_list: ScopeList<BulkAddress>,
    /// Address ranges
    pub ip_ranges: Vec<IpRange>,
    /// Subnets
    pub subnets:   ScopeList<Subnet>,
}

impl NormalizedScope {
    /// Normalize the scope fields of a request
    pub fn from_request(request: &DiscoveryRequest) -> Result<Self> {
        Ok(Self {
            bulk_list: normalize_nodes(request.nodes.as_deref()),
            ip_ranges: normalize_ip_ranges(request.ip_ranges.as_deref())?,
            subnets:   normalize_subnets(request.subnets.as_deref())?,
        })
    }

    /// Combine with resolved credentials into the plugin configuration
    pub fn into_plugin_configuration(
        self,
        credentials: Vec<CredentialOrderEntry>,
        policy: &DiscoveryPolicy,
    ) -> CorePluginConfiguration {
        CorePluginConfiguration {
            bulk_list: self.bulk_list,
            ip_ranges: self.ip_ranges,
            subnets: self.subnets,
            credentials,
            wmi_retries_count: policy.wmi_retries_count,
            wmi_retry_interval_ms: policy.wmi_retry_interval_ms,
        }
    }
}

/// Split `entry` on exactly one `separator`
fn split_pair(
    entry: &str,
    separator: char,
    field: &str,
    expected: &str,
) -> Result<(String, String)> {
    let mut parts = entry.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first.to_string(), second.to_string())),
        _ => Err(Report::new(Error::invalid_entry(field, entry, expected))),
    }
}
