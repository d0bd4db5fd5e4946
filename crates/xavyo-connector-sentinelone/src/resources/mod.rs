//! Resource types, mappers and traversal units for SentinelOne.
//!
//! Hierarchy:
//!
//! ```text
//! account ─┬─ user
//!          ├─ service_user
//!          └─ site
//! role ────── user, service_user   (grants only)
//! ```

mod account;
mod role;
mod service_user;
mod site;
mod user;

use std::sync::OnceLock;

use xavyo_connector::prelude::*;

use crate::models::{Account, Role, ServiceUser, Site, User};

pub use account::AccountSyncer;
pub use role::RoleSyncer;
pub use service_user::ServiceUserSyncer;
pub use site::SiteSyncer;
pub use user::UserSyncer;

/// Slug of the membership entitlement on accounts and sites.
pub const MEMBER_ENTITLEMENT: &str = "member";

pub(crate) struct ResourceTypes {
    pub account: ResourceType,
    pub user: ResourceType,
    pub service_user: ResourceType,
    pub role: ResourceType,
    pub site: ResourceType,
}

/// The five resource types this connector syncs.
pub(crate) fn resource_types() -> &'static ResourceTypes {
    static TYPES: OnceLock<ResourceTypes> = OnceLock::new();
    TYPES.get_or_init(|| ResourceTypes {
        account: ResourceType::new(Phase::Account.type_id(), "Account"),
        user: ResourceType::new(Phase::User.type_id(), "User")
            .with_trait(ResourceTrait::User)
            .with_skip_entitlements_and_grants(),
        service_user: ResourceType::new(Phase::ServiceUser.type_id(), "Service User")
            .with_trait(ResourceTrait::User)
            .with_skip_entitlements_and_grants(),
        role: ResourceType::new(Phase::Role.type_id(), "Role").with_trait(ResourceTrait::Role),
        site: ResourceType::new(Phase::Site.type_id(), "Site"),
    })
}

/// Resource type named by a page token frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Account,
    User,
    ServiceUser,
    Role,
    Site,
}

impl Phase {
    pub(crate) fn type_id(self) -> &'static str {
        match self {
            Phase::Account => "account",
            Phase::User => "user",
            Phase::ServiceUser => "service_user",
            Phase::Role => "role",
            Phase::Site => "site",
        }
    }

    fn from_type_id(id: &str) -> Option<Self> {
        match id {
            "account" => Some(Phase::Account),
            "user" => Some(Phase::User),
            "service_user" => Some(Phase::ServiceUser),
            "role" => Some(Phase::Role),
            "site" => Some(Phase::Site),
            _ => None,
        }
    }

    /// A fresh page token frame for this phase.
    pub(crate) fn frame(self) -> PageState {
        PageState::for_type(self.type_id())
    }

    /// Initial token frame id for a unit rooted at this phase.
    pub(crate) fn root(self) -> ResourceId {
        ResourceId::for_type(self.type_id())
    }

    /// Phase of the bag's current frame.
    pub(crate) fn current(bag: &Bag, operation: &str) -> ConnectorResult<Self> {
        let id = bag.resource_type_id().unwrap_or_default();
        Phase::from_type_id(id)
            .ok_or_else(|| ConnectorError::unexpected_resource_type(id, operation))
    }

    /// Error for a phase a unit does not traverse.
    pub(crate) fn unexpected(self, operation: &str) -> ConnectorError {
        ConnectorError::unexpected_resource_type(self.type_id(), operation)
    }
}

/// Split a full name at the first whitespace boundary.
///
/// "Mary Jane Doe" becomes ("Mary", "Jane Doe"); a single word is all first name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (full_name.to_string(), String::new()),
    }
}

pub fn account_resource(account: &Account) -> Resource {
    let types = resource_types();
    Resource::new(&account.name, &types.account, &account.id)
        .with_child_type(&types.user)
        .with_child_type(&types.service_user)
        .with_child_type(&types.site)
}

pub fn user_resource(user: &User, parent: Option<&ResourceId>) -> Resource {
    let (first_name, last_name) = split_full_name(&user.full_name);
    let profile = AttributeSet::new()
        .with("first_name", first_name)
        .with("last_name", last_name)
        .with("login", user.email.as_str())
        .with("user_id", user.id.as_str());

    let user_trait = UserTrait::new()
        .with_profile(profile)
        .with_status(UserStatus::Enabled)
        .with_email(user.email.as_str(), true);

    Resource::new(&user.full_name, &resource_types().user, &user.id)
        .with_parent(parent)
        .with_user_trait(user_trait)
}

pub fn service_user_resource(service_user: &ServiceUser, parent: Option<&ResourceId>) -> Resource {
    let (first_name, last_name) = split_full_name(&service_user.name);
    let mut profile = AttributeSet::new()
        .with("first_name", first_name)
        .with("last_name", last_name)
        .with("user_id", service_user.id.as_str());
    if !service_user.description.is_empty() {
        profile.set("description", service_user.description.as_str());
    }

    let user_trait = UserTrait::new()
        .with_profile(profile)
        .with_status(UserStatus::Unspecified)
        .with_account_type(AccountType::Service);

    Resource::new(&service_user.name, &resource_types().service_user, &service_user.id)
        .with_parent(parent)
        .with_user_trait(user_trait)
}

pub fn role_resource(role: &Role) -> Resource {
    let mut profile = AttributeSet::new()
        .with("role_name", role.name())
        .with("role_id", role.id());
    if let Some(account_name) = role.account_name() {
        profile.set("account_name", account_name);
    }

    Resource::new(role.name(), &resource_types().role, role.id())
        .with_role_trait(RoleTrait::new(profile))
}

pub fn site_resource(site: &Site, parent: Option<&ResourceId>) -> Resource {
    Resource::new(&site.name, &resource_types().site, &site.id).with_parent(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserScope;

    #[test]
    fn test_phase_of_unknown_frame() {
        let mut bag = Bag::new();
        bag.push(PageState::for_type("group"));
        let err = Phase::current(&bag, "fetching grants for an account").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected resource type 'group' while fetching grants for an account"
        );
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(split_full_name("Jane Doe"), ("Jane".into(), "Doe".into()));
        assert_eq!(split_full_name("Madonna"), ("Madonna".into(), String::new()));
        assert_eq!(
            split_full_name("Mary Jane Doe"),
            ("Mary".into(), "Jane Doe".into())
        );
        assert_eq!(split_full_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_account_resource_declares_children() {
        let account = Account {
            id: "a1".into(),
            name: "Acme".into(),
            account_type: "Paid".into(),
            is_default: false,
        };
        let resource = account_resource(&account);

        assert_eq!(resource.id, ResourceId::new("account", "a1"));
        assert_eq!(resource.display_name, "Acme");
        assert_eq!(
            resource.child_resource_types,
            vec!["user", "service_user", "site"]
        );
    }

    #[test]
    fn test_user_resource() {
        let parent = ResourceId::new("account", "a1");
        let user = User {
            id: "u1".into(),
            email: "jane@example.com".into(),
            full_name: "Jane Doe".into(),
            scope: UserScope::Account,
            scope_roles: Vec::new(),
        };
        let resource = user_resource(&user, Some(&parent));

        assert_eq!(resource.parent_id, Some(parent));
        let user_trait = resource.user_trait.unwrap();
        assert_eq!(user_trait.status, UserStatus::Enabled);
        assert_eq!(user_trait.profile.get_string("first_name"), Some("Jane"));
        assert_eq!(user_trait.profile.get_string("last_name"), Some("Doe"));
        assert_eq!(user_trait.profile.get_string("login"), Some("jane@example.com"));
        assert_eq!(user_trait.emails.len(), 1);
        assert!(user_trait.emails[0].is_primary);
    }

    #[test]
    fn test_service_user_resource() {
        let service_user = ServiceUser {
            id: "s1".into(),
            name: "ci-bot".into(),
            description: "CI pipeline".into(),
            scope: UserScope::Site,
            scope_roles: Vec::new(),
        };
        let resource = service_user_resource(&service_user, None);

        assert_eq!(resource.id, ResourceId::new("service_user", "s1"));
        let user_trait = resource.user_trait.unwrap();
        assert_eq!(user_trait.status, UserStatus::Unspecified);
        assert_eq!(user_trait.account_type, AccountType::Service);
        assert_eq!(user_trait.profile.get_string("first_name"), Some("ci-bot"));
        assert_eq!(user_trait.profile.get_string("description"), Some("CI pipeline"));
        assert!(user_trait.emails.is_empty());
    }

    #[test]
    fn test_role_resource_scope_bound() {
        let role = Role::ScopeBound {
            role_id: "42".into(),
            role_name: "Admin".into(),
            account_name: "Acme".into(),
        };
        let resource = role_resource(&role);

        assert_eq!(resource.id, ResourceId::new("role", "42"));
        assert_eq!(resource.display_name, "Admin");
        let profile = resource.role_trait.unwrap().profile;
        assert_eq!(profile.get_string("role_id"), Some("42"));
        assert_eq!(profile.get_string("account_name"), Some("Acme"));
    }

    #[test]
    fn test_role_resource_predefined() {
        let role = Role::Predefined {
            id: "7".into(),
            name: "Viewer".into(),
        };
        let resource = role_resource(&role);

        assert_eq!(resource.id, ResourceId::new("role", "7"));
        assert_eq!(resource.display_name, "Viewer");
        assert!(!resource.role_trait.unwrap().profile.has("account_name"));
    }
}
