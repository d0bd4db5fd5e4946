//! Connector Framework ID types
//!
//! Identifiers for graph nodes and sync runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a resource in the governance graph.
///
/// A resource is addressed by its resource type (e.g. "account") and the
/// identifier the target system assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type identifier (e.g. "user", "role").
    pub resource_type: String,
    /// Identifier of the resource in the target system.
    pub resource: String,
}

impl ResourceId {
    /// Create a new resource identifier.
    pub fn new(resource_type: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource: resource.into(),
        }
    }

    /// Create an identifier that names only a resource type.
    ///
    /// Used to seed a page token before any concrete resource is known.
    pub fn for_type(resource_type: impl Into<String>) -> Self {
        Self::new(resource_type, "")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Unique identifier for one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncId(Uuid);

impl SyncId {
    /// Create a new random SyncId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse from a string representation.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SyncId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SyncId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for SyncId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_display() {
        let id = ResourceId::new("account", "123");
        assert_eq!(id.to_string(), "account:123");
    }

    #[test]
    fn test_resource_id_for_type() {
        let id = ResourceId::for_type("role");
        assert_eq!(id.resource_type, "role");
        assert!(id.resource.is_empty());
    }

    #[test]
    fn test_sync_id_parse() {
        let id = SyncId::new();
        let parsed: SyncId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_sync_id_unique() {
        assert_ne!(SyncId::new(), SyncId::new());
    }
}
