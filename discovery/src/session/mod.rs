//! Platform session seam
//!
//! The submission logic talks to the platform only through these two traits, so
//! it can run against the SWIS implementation in [`swis`] or against a fake in
//! tests.

mod http_client;
mod swis;
mod types;

use async_trait::async_trait;
use serde_json::Value;
pub use swis::{SwisConnector, SwisSession};
pub use types::{CredentialId, EngineId};

use crate::error::Result;

/// Opens sessions against a named platform
#[async_trait]
pub trait PlatformConnector: Send + Sync {
    /// Establish a session with `platform`
    ///
    /// # Errors
    /// `Connection` when the platform cannot be reached, `Configuration` when the
    /// platform is not known locally.
    async fn connect(&self, platform: &str) -> Result<Box<dyn PlatformSession>>;
}

/// A connected platform session
#[async_trait]
pub trait PlatformSession: Send + Sync {
    /// Resolve an SNMP community string to the platform's credential id
    async fn resolve_credential(&self, community: &str) -> Result<CredentialId>;

    /// Resolve a poller name to the platform's engine id
    async fn resolve_engine(&self, poller: &str) -> Result<EngineId>;

    /// Invoke `namespace.operation` with `parameters` and return the platform's result
    ///
    /// # Errors
    /// `Platform` with the response body when the platform rejects the call.
    async fn invoke(&self, namespace: &str, operation: &str, parameters: Value) -> Result<Value>;
}
