//! Connector Framework traits
//!
//! A connector exposes one [`ResourceSyncer`] per resource type it syncs.
//! The sync engine drives them page by page and owns the page token
//! between calls.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ConnectorResult;
use crate::ids::ResourceId;
use crate::resource::{Entitlement, Grant, Page, Resource, ResourceType};

/// Descriptive metadata for a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMetadata {
    pub display_name: String,
    pub description: String,
}

/// Traversal unit for one resource type.
///
/// Every operation takes the opaque page token returned by the previous call
/// (empty for the first call) and returns the next token, which is empty once
/// the traversal is complete.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer traverses.
    fn resource_type(&self) -> &ResourceType;

    /// List resources of this type, optionally scoped to a parent resource.
    async fn list(&self, parent: Option<&ResourceId>, token: &str)
        -> ConnectorResult<Page<Resource>>;

    /// Describe the entitlements grantable on a resource.
    async fn entitlements(&self, resource: &Resource, token: &str)
        -> ConnectorResult<Page<Entitlement>>;

    /// List the grants held on a resource.
    async fn grants(&self, resource: &Resource, token: &str) -> ConnectorResult<Page<Grant>>;
}

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connector metadata.
    fn metadata(&self) -> ConnectorMetadata;

    /// Confirm credentials and connectivity before a sync.
    async fn validate(&self) -> ConnectorResult<()>;

    /// The syncers this connector registers, in sync order.
    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>>;
}
