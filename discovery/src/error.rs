use serde_json::Value;
use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_MISSING_PREFIX: &str = "Missing";

/// Result type for the `orion_discovery` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Error kinds surfaced by a discovery submission
///
/// Each kind maps to one stage of the submission so a caller can tell whether
/// anything reached the platform: `Configuration`, `InvalidRequest` and `Format`
/// are always raised before a session is opened.
#[derive(Debug, Error)]
pub enum Error {
    /// No platform could be resolved, or the configuration could not be read
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session establishment with the platform failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A community string has no matching platform credential
    #[error("Credential resolution failed: {0}")]
    CredentialResolution(String),

    /// A poller name has no matching engine
    #[error("Engine resolution failed: {0}")]
    EngineResolution(String),

    /// A scope entry is missing its required separator
    #[error("Format error: {0}")]
    Format(String),

    /// The request itself is unusable (empty name or community list)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The platform rejected a remote call; `payload` is its response verbatim
    #[error("Platform rejected {operation}: {payload}")]
    Platform {
        /// `namespace.operation` that was rejected
        operation: String,
        /// Response body returned by the platform
        payload:   Value,
    },
}

impl Error {
    /// Create a "Failed to X" connection error
    pub fn connect_failed(platform: &str, details: impl std::fmt::Display) -> Self {
        Self::Connection(format!(
            "{MSG_FAILED_TO_PREFIX} connect to platform '{platform}': {details}"
        ))
    }

    /// Create an "Invalid X" format error for a scope entry
    pub fn invalid_entry(field: &str, entry: &str, expected: &str) -> Self {
        Self::Format(format!(
            "{MSG_INVALID_PREFIX} {field} entry '{entry}': expected {expected}"
        ))
    }

    /// Create a "Missing X" request error
    pub fn missing(what: &str) -> Self {
        Self::InvalidRequest(format!("{MSG_MISSING_PREFIX} {what}"))
    }

    /// Create a platform error carrying the rejected operation and its payload
    pub fn platform_rejected(operation: impl Into<String>, payload: Value) -> Self {
        Self::Platform {
            operation: operation.into(),
            payload,
        }
    }

    /// Create error for credential lookups
    pub fn unknown_community(community: &str, details: impl std::fmt::Display) -> Self {
        Self::CredentialResolution(format!(
            "{MSG_FAILED_TO_PREFIX} resolve SNMP community '{community}': {details}"
        ))
    }

    /// Create error for engine lookups
    pub fn unknown_poller(poller: &str, details: impl std::fmt::Display) -> Self {
        Self::EngineResolution(format!(
            "{MSG_FAILED_TO_PREFIX} resolve poller '{poller}': {details}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_messages_name_the_failing_input() {
        let err = Error::unknown_community("public", "no matching credential");
        assert_eq!(
            err.to_string(),
            "Credential resolution failed: Failed to resolve SNMP community 'public': no matching credential"
        );

        let err = Error::invalid_entry("ip_ranges", "bad-entry", "'start:end'");
        assert!(err.to_string().contains("'bad-entry'"));
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_platform_error_keeps_payload() {
        let payload = json!({"Message": "Engine not found"});
        let err = Error::platform_rejected("Orion.Discovery.StartDiscovery", payload.clone());

        match err {
            Error::Platform {
                operation,
                payload: kept,
            } => {
                assert_eq!(operation, "Orion.Discovery.StartDiscovery");
                assert_eq!(kept, payload);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
