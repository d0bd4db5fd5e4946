//! Sync engine
//!
//! Drives a connector's resource syncers to build the full resource,
//! entitlement and grant graph. The engine owns every page token: it feeds
//! each token back into the syncer that produced it until the syncer returns
//! an empty token.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::{ConnectorError, ConnectorResult};
use crate::ids::{ResourceId, SyncId};
use crate::resource::{Entitlement, Grant, Resource};
use crate::traits::{Connector, ConnectorMetadata, ResourceSyncer};

/// Result of a full sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub sync_id: SyncId,
    pub connector: ConnectorMetadata,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub resources: Vec<Resource>,
    pub entitlements: Vec<Entitlement>,
    pub grants: Vec<Grant>,
}

/// Sequential, single-connector sync engine.
pub struct Syncer {
    connector: Arc<dyn Connector>,
    syncers: Vec<Arc<dyn ResourceSyncer>>,
    by_type: HashMap<String, Arc<dyn ResourceSyncer>>,
}

impl Syncer {
    /// Create a sync engine for a connector.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        let syncers = connector.resource_syncers();
        let by_type = syncers
            .iter()
            .map(|s| (s.resource_type().id.clone(), Arc::clone(s)))
            .collect();

        Self {
            connector,
            syncers,
            by_type,
        }
    }

    /// Validate the connector, then sync resources, entitlements and grants.
    pub async fn run(&self) -> ConnectorResult<SyncReport> {
        let sync_id = SyncId::new();
        let started_at = Utc::now();
        let metadata = self.connector.metadata();

        info!(%sync_id, connector = %metadata.display_name, "Starting sync");

        self.connector.validate().await?;

        let resources = self.sync_resources().await?;
        info!(%sync_id, count = resources.len(), "Resources synced");

        let entitlements = self.sync_entitlements(&resources).await?;
        info!(%sync_id, count = entitlements.len(), "Entitlements synced");

        let grants = self.sync_grants(&resources).await?;
        info!(%sync_id, count = grants.len(), "Grants synced");

        Ok(SyncReport {
            sync_id,
            connector: metadata,
            started_at,
            finished_at: Utc::now(),
            resources,
            entitlements,
            grants,
        })
    }

    fn syncer_for(&self, resource_type: &str) -> ConnectorResult<&Arc<dyn ResourceSyncer>> {
        self.by_type
            .get(resource_type)
            .ok_or_else(|| ConnectorError::ResourceSyncerNotFound {
                resource_type: resource_type.to_string(),
            })
    }

    /// List every registered type at the root, then each declared child type
    /// under every resource that declares it.
    #[instrument(skip(self))]
    async fn sync_resources(&self) -> ConnectorResult<Vec<Resource>> {
        let mut queue: VecDeque<(String, Option<ResourceId>)> = self
            .syncers
            .iter()
            .map(|s| (s.resource_type().id.clone(), None))
            .collect();

        let mut seen = HashSet::new();
        let mut resources = Vec::new();

        while let Some((resource_type, parent)) = queue.pop_front() {
            let syncer = self.syncer_for(&resource_type)?;
            let listed = self.list_all(syncer.as_ref(), parent.as_ref()).await?;

            for resource in listed {
                if !seen.insert(resource.id.clone()) {
                    continue;
                }
                for child in &resource.child_resource_types {
                    queue.push_back((child.clone(), Some(resource.id.clone())));
                }
                resources.push(resource);
            }
        }

        Ok(resources)
    }

    async fn list_all(
        &self,
        syncer: &dyn ResourceSyncer,
        parent: Option<&ResourceId>,
    ) -> ConnectorResult<Vec<Resource>> {
        let operation = match parent {
            Some(p) => format!("listing {} under {}", syncer.resource_type().id, p),
            None => format!("listing {}", syncer.resource_type().id),
        };

        let mut all = Vec::new();
        let mut token = String::new();
        loop {
            let page = syncer.list(parent, &token).await?;
            debug!(operation = %operation, items = page.items.len(), "Fetched page");
            all.extend(page.items);
            if page.next_token.is_empty() {
                return Ok(all);
            }
            ensure_progress(&token, &page.next_token, &operation)?;
            token = page.next_token;
        }
    }

    #[instrument(skip(self, resources))]
    async fn sync_entitlements(&self, resources: &[Resource]) -> ConnectorResult<Vec<Entitlement>> {
        let mut all = Vec::new();
        for resource in resources {
            let syncer = self.syncer_for(&resource.id.resource_type)?;
            if syncer.resource_type().skip_entitlements_and_grants {
                continue;
            }
            let operation = format!("listing entitlements for {}", resource.id);
            let mut token = String::new();
            loop {
                let page = syncer.entitlements(resource, &token).await?;
                all.extend(page.items);
                if page.next_token.is_empty() {
                    break;
                }
                ensure_progress(&token, &page.next_token, &operation)?;
                token = page.next_token;
            }
        }
        Ok(all)
    }

    #[instrument(skip(self, resources))]
    async fn sync_grants(&self, resources: &[Resource]) -> ConnectorResult<Vec<Grant>> {
        let mut all = Vec::new();
        for resource in resources {
            let syncer = self.syncer_for(&resource.id.resource_type)?;
            if syncer.resource_type().skip_entitlements_and_grants {
                continue;
            }
            let operation = format!("listing grants for {}", resource.id);
            let mut token = String::new();
            loop {
                let page = syncer.grants(resource, &token).await?;
                debug!(operation = %operation, items = page.items.len(), "Fetched page");
                all.extend(page.items);
                if page.next_token.is_empty() {
                    break;
                }
                ensure_progress(&token, &page.next_token, &operation)?;
                token = page.next_token;
            }
        }
        Ok(all)
    }
}

fn ensure_progress(previous: &str, next: &str, operation: &str) -> ConnectorResult<()> {
    if previous == next {
        return Err(ConnectorError::PaginationStalled {
            operation: operation.to_string(),
        });
    }
    Ok(())
}
