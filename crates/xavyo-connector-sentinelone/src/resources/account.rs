//! Account traversal unit.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use xavyo_connector::prelude::*;

use super::{account_resource, resource_types, Phase, MEMBER_ENTITLEMENT};
use crate::client::{QueryParams, SentinelOneClient};

const GRANTS_OPERATION: &str = "fetching grants for an account";

/// Lists accounts and grants account membership to users, service users and sites.
pub struct AccountSyncer {
    client: Arc<SentinelOneClient>,
}

impl AccountSyncer {
    pub fn new(client: Arc<SentinelOneClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for AccountSyncer {
    fn resource_type(&self) -> &ResourceType {
        &resource_types().account
    }

    #[instrument(skip(self, token))]
    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        let (mut bag, cursor) = Bag::parse(token, &Phase::Account.root())?;

        let page = self
            .client
            .get_accounts(&QueryParams::new().cursor(cursor))
            .await
            .map_err(|e| e.context("failed to list accounts"))?;

        let next_token = bag.next_token(&page.next_cursor)?;
        let resources = page.records.iter().map(account_resource).collect();

        Ok(Page::new(resources, next_token))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _token: &str,
    ) -> ConnectorResult<Page<Entitlement>> {
        let types = resource_types();
        let member = Entitlement::assignment(resource, MEMBER_ENTITLEMENT)
            .with_grantable_to(&[&types.user, &types.site, &types.service_user])
            .with_display_name(format!(
                "{} Account {}",
                resource.display_name, MEMBER_ENTITLEMENT
            ))
            .with_description(format!(
                "Access to {} account in SentinelOne",
                resource.display_name
            ));

        Ok(Page::new(vec![member], ""))
    }

    #[instrument(skip(self, resource, token), fields(account = %resource.id.resource))]
    async fn grants(&self, resource: &Resource, token: &str) -> ConnectorResult<Page<Grant>> {
        let (mut bag, cursor) = Bag::parse(token, &Phase::Account.root())?;
        let account_id = resource.id.resource.as_str();
        let mut grants = Vec::new();

        match Phase::current(&bag, GRANTS_OPERATION)? {
            Phase::Account => {
                bag.pop();
                bag.push_all([
                    Phase::User.frame(),
                    Phase::ServiceUser.frame(),
                    Phase::Site.frame(),
                ]);
            }
            Phase::User => {
                let page = self
                    .client
                    .get_users(&QueryParams::new().accounts_filter(account_id).cursor(cursor))
                    .await
                    .map_err(|e| {
                        e.context(format!("failed to list users for account {account_id}"))
                    })?;
                bag.next(&page.next_cursor)?;
                grants.extend(page.records.iter().map(|user| {
                    Grant::new(
                        resource,
                        MEMBER_ENTITLEMENT,
                        ResourceId::new(Phase::User.type_id(), user.id.as_str()),
                    )
                }));
            }
            Phase::ServiceUser => {
                let page = self
                    .client
                    .get_service_users(
                        &QueryParams::new().accounts_filter(account_id).cursor(cursor),
                    )
                    .await
                    .map_err(|e| {
                        e.context(format!("failed to list service users for account {account_id}"))
                    })?;
                bag.next(&page.next_cursor)?;
                grants.extend(page.records.iter().map(|service_user| {
                    Grant::new(
                        resource,
                        MEMBER_ENTITLEMENT,
                        ResourceId::new(Phase::ServiceUser.type_id(), service_user.id.as_str()),
                    )
                }));
            }
            Phase::Site => {
                let page = self
                    .client
                    .get_sites(&QueryParams::new().accounts_filter(account_id).cursor(cursor))
                    .await
                    .map_err(|e| {
                        e.context(format!("failed to list sites for account {account_id}"))
                    })?;
                bag.next(&page.next_cursor)?;
                grants.extend(page.records.iter().map(|site| {
                    Grant::new(
                        resource,
                        MEMBER_ENTITLEMENT,
                        ResourceId::new(Phase::Site.type_id(), site.id.as_str()),
                    )
                }));
            }
            phase => return Err(phase.unexpected(GRANTS_OPERATION)),
        }

        debug!(grants = grants.len(), "Fetched account grants");
        Ok(Page::new(grants, bag.marshal()?))
    }
}
