use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use xavyo_connector::prelude::*;

use super::{resource_types, service_user_resource, Phase};
use crate::client::{QueryParams, SentinelOneClient};

/// Lists API service users under an account.
pub struct ServiceUserSyncer {
    client: Arc<SentinelOneClient>,
}

impl ServiceUserSyncer {
    pub fn new(client: Arc<SentinelOneClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for ServiceUserSyncer {
    fn resource_type(&self) -> &ResourceType {
        &resource_types().service_user
    }

    #[instrument(skip(self, token))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        let Some(parent) = parent else {
            return Ok(Page::empty());
        };

        let (mut bag, cursor) = Bag::parse(token, &Phase::ServiceUser.root())?;
        let page = self
            .client
            .get_service_users(
                &QueryParams::new()
                    .accounts_filter(parent.resource.as_str())
                    .cursor(cursor),
            )
            .await
            .map_err(|e| e.context(format!("failed to list service users for {parent}")))?;

        let next_token = bag.next_token(&page.next_cursor)?;
        let resources = page
            .records
            .iter()
            .map(|service_user| service_user_resource(service_user, Some(parent)))
            .collect();

        Ok(Page::new(resources, next_token))
    }

    async fn entitlements(
        &self,
        _resource: &Resource,
        _token: &str,
    ) -> ConnectorResult<Page<Entitlement>> {
        Ok(Page::empty())
    }

    async fn grants(&self, _resource: &Resource, _token: &str) -> ConnectorResult<Page<Grant>> {
        Ok(Page::empty())
    }
}
