//! Site traversal unit.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use xavyo_connector::prelude::*;

use super::{resource_types, site_resource, Phase, MEMBER_ENTITLEMENT};
use crate::client::{QueryParams, SentinelOneClient};

const GRANTS_OPERATION: &str = "fetching grants for a site";

/// Lists sites under an account and grants site membership to users and
/// service users.
pub struct SiteSyncer {
    client: Arc<SentinelOneClient>,
}

impl SiteSyncer {
    pub fn new(client: Arc<SentinelOneClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for SiteSyncer {
    fn resource_type(&self) -> &ResourceType {
        &resource_types().site
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

        let (mut bag, cursor) = Bag::parse(token, &Phase::Site.root())?;
        let page = self
            .client
            .get_sites(
                &QueryParams::new()
                    .accounts_filter(parent.resource.as_str())
                    .cursor(cursor),
            )
            .await
            .map_err(|e| e.context(format!("failed to list sites for {parent}")))?;

        let next_token = bag.next_token(&page.next_cursor)?;
        let resources = page
            .records
            .iter()
            .map(|site| site_resource(site, Some(parent)))
            .collect();

        Ok(Page::new(resources, next_token))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _token: &str,
    ) -> ConnectorResult<Page<Entitlement>> {
        let types = resource_types();
        let member = Entitlement::assignment(resource, MEMBER_ENTITLEMENT)
            .with_grantable_to(&[&types.user, &types.service_user])
            .with_display_name(format!("{} Site {}", resource.display_name, MEMBER_ENTITLEMENT))
            .with_description(format!(
                "Access to {} site in SentinelOne",
                resource.display_name
            ));

        Ok(Page::new(vec![member], ""))
    }

    #[instrument(skip(self, resource, token), fields(site = %resource.id.resource))]
    async fn grants(&self, resource: &Resource, token: &str) -> ConnectorResult<Page<Grant>> {
        let (mut bag, cursor) = Bag::parse(token, &Phase::Site.root())?;
        let site_id = resource.id.resource.as_str();
        let mut grants = Vec::new();

        match Phase::current(&bag, GRANTS_OPERATION)? {
            Phase::Site => {
                bag.pop();
                bag.push_all([Phase::User.frame(), Phase::ServiceUser.frame()]);
            }
            Phase::User => {
                let page = self
                    .client
                    .get_users(&QueryParams::new().sites_filter(site_id).cursor(cursor))
                    .await
                    .map_err(|e| e.context(format!("failed to list users for site {site_id}")))?;
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
                    .get_service_users(&QueryParams::new().sites_filter(site_id).cursor(cursor))
                    .await
                    .map_err(|e| {
                        e.context(format!("failed to list service users for site {site_id}"))
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
            phase => return Err(phase.unexpected(GRANTS_OPERATION)),
        }

        debug!(grants = grants.len(), "Fetched site grants");
        Ok(Page::new(grants, bag.marshal()?))
    }
}
