//! # Connector Framework
//!
//! Core abstractions for syncing identity data from external systems into
//! xavyo's governance graph.
//!
//! ## Architecture
//!
//! A connector registers one [`ResourceSyncer`](traits::ResourceSyncer) per
//! resource type. Each syncer answers three paginated questions:
//!
//! - `list` - which resources of this type exist (optionally under a parent)
//! - `entitlements` - which named permissions each resource offers
//! - `grants` - which principals hold those entitlements
//!
//! Pagination state travels in an opaque token (see [`pagination::Bag`])
//! which the caller hands back verbatim. The [`syncer::Syncer`] engine drives
//! every syncer until its token is exhausted.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use xavyo_connector::prelude::*;
//!
//! let connector: Arc<dyn Connector> = Arc::new(my_connector);
//! connector.validate().await?;
//!
//! let report = Syncer::new(connector).run().await?;
//! println!("{} grants", report.grants.len());
//! ```
//!
//! ## Crate Organization
//!
//! - [`ids`] - Resource and sync identifiers
//! - [`types`] - Resource traits, user status and account type enums
//! - [`profile`] - Profile attribute sets
//! - [`resource`] - Resources, entitlements, grants and pages
//! - [`pagination`] - Page token stack
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - Connector and resource syncer traits
//! - [`config`] - Configuration trait and connection settings
//! - [`syncer`] - Sync engine

pub mod config;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod profile;
pub mod resource;
pub mod syncer;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use xavyo_connector::prelude::*;
/// ```
pub mod prelude {
    // IDs
    pub use crate::ids::{ResourceId, SyncId};

    // Types and enums
    pub use crate::types::{AccountType, ResourceTrait, UserStatus};

    // Error handling
    pub use crate::error::{ConnectorError, ConnectorResult};

    // Traits
    pub use crate::traits::{Connector, ConnectorMetadata, ResourceSyncer};

    // Graph
    pub use crate::profile::{AttributeSet, AttributeValue};
    pub use crate::resource::{
        Entitlement, EntitlementPurpose, Grant, Page, Resource, ResourceType, RoleTrait,
        UserEmail, UserTrait,
    };

    // Pagination
    pub use crate::pagination::{Bag, PageState};

    // Configuration
    pub use crate::config::{ConnectionSettings, ConnectorConfig, REDACTED};

    // Engine
    pub use crate::syncer::{SyncReport, Syncer};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
