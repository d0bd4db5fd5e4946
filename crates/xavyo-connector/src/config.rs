//! Connector Framework configuration types
//!
//! Base trait and common configuration structures.

use serde::{Deserialize, Serialize};

use crate::error::ConnectorResult;

/// Trait for connector-specific configuration.
pub trait ConnectorConfig: Clone + Send + Sync {
    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid.
    fn validate(&self) -> ConnectorResult<()>;

    /// Get credentials that need to be protected.
    ///
    /// Returns a list of (field_name, value) pairs for sensitive data.
    fn get_credentials(&self) -> Vec<(&'static str, String)>;

    /// Create a redacted version of this config (for logging/display).
    fn redacted(&self) -> Self;
}

/// Placeholder used when redacting secrets.
pub const REDACTED: &str = "***REDACTED***";

/// Common connection settings shared across connector types.
///
/// There is no request timeout here: request deadlines belong to the caller,
/// which cancels an in-flight call by dropping its future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// TCP connect timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Maximum idle pooled connections per host.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_pool_size() -> usize {
    5
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connection_timeout_secs: default_connection_timeout(),
            pool_size: default_pool_size(),
        }
    }
}

impl ConnectionSettings {
    /// Create new connection settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set the pool size.
    #[must_use]
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Get connection timeout as Duration.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connection_timeout_secs)
    }
}
