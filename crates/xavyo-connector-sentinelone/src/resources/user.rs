use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use xavyo_connector::prelude::*;

use super::{resource_types, user_resource, Phase};
use crate::client::{QueryParams, SentinelOneClient};

/// Lists console users under an account. Users are principals only.
pub struct UserSyncer {
    client: Arc<SentinelOneClient>,
}

impl UserSyncer {
    pub fn new(client: Arc<SentinelOneClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &ResourceType {
        &resource_types().user
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

        let (mut bag, cursor) = Bag::parse(token, &Phase::User.root())?;
        let page = self
            .client
            .get_users(
                &QueryParams::new()
                    .accounts_filter(parent.resource.as_str())
                    .cursor(cursor),
            )
            .await
            .map_err(|e| e.context(format!("failed to list users for {parent}")))?;

        let next_token = bag.next_token(&page.next_cursor)?;
        let resources = page
            .records
            .iter()
            .map(|user| user_resource(user, Some(parent)))
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
