//! Role traversal unit.
//!
//! The API only lists predefined roles. Custom scope roles are embedded in
//! the users and service users that hold them, so listing roles pages the
//! predefined roles, then every user, then every service user. A role held
//! by several principals is listed once per holder.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use xavyo_connector::prelude::*;

use super::{resource_types, role_resource, Phase};
use crate::client::{QueryParams, SentinelOneClient};
use crate::models::{Role, UserScope};

const LIST_OPERATION: &str = "listing roles";
const GRANTS_OPERATION: &str = "fetching grants for a role";

/// Role entitlement slugs, one per assignment scope.
pub const SCOPE_ENTITLEMENTS: [(UserScope, &str); 3] = [
    (UserScope::Account, "account scope"),
    (UserScope::Site, "site scope"),
    (UserScope::Tenant, "tenant scope"),
];

/// Entitlement slug for a role held at `scope`.
pub fn scope_entitlement(scope: UserScope) -> Option<&'static str> {
    SCOPE_ENTITLEMENTS
        .iter()
        .find(|(s, _)| *s == scope)
        .map(|(_, slug)| *slug)
}

/// Lists predefined and scope roles and grants them to their holders.
pub struct RoleSyncer {
    client: Arc<SentinelOneClient>,
}

impl RoleSyncer {
    pub fn new(client: Arc<SentinelOneClient>) -> Self {
        Self { client }
    }

    fn grant_for(
        resource: &Resource,
        scope: UserScope,
        principal: ResourceId,
    ) -> Option<Grant> {
        match scope_entitlement(scope) {
            Some(slug) => Some(Grant::new(resource, slug, principal)),
            None => {
                warn!(
                    role = %resource.id.resource,
                    principal = %principal,
                    "Skipping role holder with unknown scope"
                );
                None
            }
        }
    }
}

#[async_trait]
impl ResourceSyncer for RoleSyncer {
    fn resource_type(&self) -> &ResourceType {
        &resource_types().role
    }

    #[instrument(skip(self, token))]
    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        let (mut bag, cursor) = Bag::parse(token, &Phase::Role.root())?;
        let mut roles: Vec<Role> = Vec::new();

        match Phase::current(&bag, LIST_OPERATION)? {
            Phase::Role => {
                let page = self
                    .client
                    .get_predefined_roles(&QueryParams::new().cursor(cursor))
                    .await
                    .map_err(|e| e.context("failed to list predefined roles"))?;
                bag.next(&page.next_cursor)?;
                roles.extend(page.records);

                if page.next_cursor.is_empty() {
                    bag.push_all([Phase::User.frame(), Phase::ServiceUser.frame()]);
                }
            }
            Phase::User => {
                let page = self
                    .client
                    .get_users(&QueryParams::new().cursor(cursor))
                    .await
                    .map_err(|e| e.context("failed to get users for custom roles"))?;
                bag.next(&page.next_cursor)?;
                roles.extend(page.records.into_iter().flat_map(|user| user.scope_roles));
            }
            Phase::ServiceUser => {
                let page = self
                    .client
                    .get_service_users(&QueryParams::new().cursor(cursor))
                    .await
                    .map_err(|e| e.context("failed to get service users for custom roles"))?;
                bag.next(&page.next_cursor)?;
                roles.extend(
                    page.records
                        .into_iter()
                        .flat_map(|service_user| service_user.scope_roles),
                );
            }
            phase => return Err(phase.unexpected(LIST_OPERATION)),
        }

        debug!(roles = roles.len(), "Fetched roles");
        let resources = roles.iter().map(role_resource).collect();
        Ok(Page::new(resources, bag.marshal()?))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _token: &str,
    ) -> ConnectorResult<Page<Entitlement>> {
        let types = resource_types();
        let entitlements = SCOPE_ENTITLEMENTS
            .iter()
            .map(|(_, slug)| {
                Entitlement::assignment(resource, *slug)
                    .with_grantable_to(&[&types.user, &types.service_user])
                    .with_display_name(format!("{} Role with {}", resource.display_name, slug))
                    .with_description(format!("{} role in SentinelOne", resource.display_name))
            })
            .collect();

        Ok(Page::new(entitlements, ""))
    }

    #[instrument(skip(self, resource, token), fields(role = %resource.id.resource))]
    async fn grants(&self, resource: &Resource, token: &str) -> ConnectorResult<Page<Grant>> {
        let (mut bag, cursor) = Bag::parse(token, &Phase::Role.root())?;
        let role_id = resource.id.resource.as_str();
        let mut grants = Vec::new();

        match Phase::current(&bag, GRANTS_OPERATION)? {
            Phase::Role => {
                bag.pop();
                bag.push_all([Phase::User.frame(), Phase::ServiceUser.frame()]);
            }
            Phase::User => {
                let page = self
                    .client
                    .get_users(&QueryParams::new().roles_filter(role_id).cursor(cursor))
                    .await
                    .map_err(|e| e.context(format!("failed to list users for role {role_id}")))?;
                bag.next(&page.next_cursor)?;
                grants.extend(page.records.iter().filter_map(|user| {
                    Self::grant_for(
                        resource,
                        user.scope,
                        ResourceId::new(Phase::User.type_id(), user.id.as_str()),
                    )
                }));
            }
            Phase::ServiceUser => {
                let page = self
                    .client
                    .get_service_users(&QueryParams::new().roles_filter(role_id).cursor(cursor))
                    .await
                    .map_err(|e| {
                        e.context(format!("failed to list service users for role {role_id}"))
                    })?;
                bag.next(&page.next_cursor)?;
                grants.extend(page.records.iter().filter_map(|service_user| {
                    Self::grant_for(
                        resource,
                        service_user.scope,
                        ResourceId::new(Phase::ServiceUser.type_id(), service_user.id.as_str()),
                    )
                }));
            }
            phase => return Err(phase.unexpected(GRANTS_OPERATION)),
        }

        debug!(grants = grants.len(), "Fetched role grants");
        Ok(Page::new(grants, bag.marshal()?))
    }
}
