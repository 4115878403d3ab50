//! Submit SNMP network discovery jobs to a SolarWinds Orion platform
//!
//! A [`DiscoveryRequest`] names a scope (nodes, subnets, IP ranges), the SNMP
//! communities to try, and optionally the platform and poller to use.
//! [`DiscoverySubmitter::submit_discovery`] turns it into the two SWIS calls the
//! platform needs:
//!
//! 1. `Orion.Discovery.CreateCorePluginConfiguration` with the normalized scope
//!    and the communities resolved to credential ids, in priority order
//! 2. `Orion.Discovery.StartDiscovery` referencing that configuration, on the
//!    resolved engine, with the job policy from [`DiscoveryPolicy`]
//!
//! The platform is reached through the [`PlatformConnector`] and
//! [`PlatformSession`] traits; [`SwisConnector`] implements them over the SWIS
//! JSON API.
//!
//! # Usage
//!
//! ```no_run
//! use orion_discovery::{DiscoveryConfig, DiscoveryRequest, DiscoverySubmitter, SwisConnector};
//!
//! # async fn run() -> orion_discovery::Result<()> {
//! let config = DiscoveryConfig::load()?;
//! let submitter = DiscoverySubmitter::new(SwisConnector::new(config.clone()), config);
//!
//! let request = DiscoveryRequest::new("Lab Net", vec!["public".into(), "private".into()])
//!     .with_poller("poller-a")
//!     .with_subnets(vec!["10.1.0.0/16".into()]);
//!
//! let handle = submitter.submit_discovery(&request).await?;
//! println!("started discovery profile {}", handle.0);
//! # Ok(())
//! # }
//! ```

mod config;
mod constants;
mod error;
mod policy;
mod request;
mod scope;
mod session;
mod submit;
pub mod support;

pub use config::{Defaults, DiscoveryConfig, PlatformConfig};
pub use error::{Error, Result};
pub use policy::{DiscoveryPolicy, SnmpVersion};
pub use request::DiscoveryRequest;
pub use scope::{
    BulkAddress, CorePluginConfiguration, CredentialOrderEntry, IpRange, NormalizedScope,
    ScopeList, Subnet, build_credential_order, normalize_ip_ranges, normalize_nodes,
    normalize_subnets,
};
pub use session::{
    CredentialId, EngineId, PlatformConnector, PlatformSession, SwisConnector, SwisSession,
};
pub use submit::{DiscoveryJobHandle, DiscoverySubmitter, DiscoveryVerb};
