use serde::{Deserialize, Serialize};

use crate::constants::PRIMARY_ENGINE_ID;

/// Platform-internal id of a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(pub i64);

/// Platform-internal id of a polling engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(pub i64);

impl EngineId {
    /// The platform's primary polling engine
    pub const PRIMARY: Self = Self(PRIMARY_ENGINE_ID);
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
