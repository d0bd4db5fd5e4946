//! Governance graph types
//!
//! Resources, entitlements and grants produced by resource syncers, plus the
//! page envelope every syncer operation returns.

use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;
use crate::profile::AttributeSet;
use crate::types::{AccountType, ResourceTrait, UserStatus};

/// A kind of resource a connector syncs (e.g. "account", "user").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Stable identifier used in resource ids and page tokens.
    pub id: String,

    /// Human readable name.
    pub display_name: String,

    /// Traits carried by resources of this type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<ResourceTrait>,

    /// Resources of this type offer no entitlements and hold no grants.
    #[serde(default)]
    pub skip_entitlements_and_grants: bool,
}

impl ResourceType {
    /// Create a new resource type without traits.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            traits: Vec::new(),
            skip_entitlements_and_grants: false,
        }
    }

    /// Mark the type as a pure principal: the sync engine will not ask it
    /// for entitlements or grants.
    #[must_use]
    pub fn with_skip_entitlements_and_grants(mut self) -> Self {
        self.skip_entitlements_and_grants = true;
        self
    }

    /// Add a trait.
    #[must_use]
    pub fn with_trait(mut self, resource_trait: ResourceTrait) -> Self {
        self.traits.push(resource_trait);
        self
    }

    /// Check whether this type carries a trait.
    #[must_use]
    pub fn has_trait(&self, resource_trait: ResourceTrait) -> bool {
        self.traits.contains(&resource_trait)
    }
}

/// Email address attached to a user trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    pub address: String,
    pub is_primary: bool,
}

/// Payload for resources of a user-trait type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTrait {
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub profile: AttributeSet,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<UserEmail>,
}

impl UserTrait {
    /// Create an empty user trait.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile.
    #[must_use]
    pub fn with_profile(mut self, profile: AttributeSet) -> Self {
        self.profile = profile;
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the account type.
    #[must_use]
    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    /// Add an email address. Empty addresses are ignored.
    #[must_use]
    pub fn with_email(mut self, address: impl Into<String>, is_primary: bool) -> Self {
        let address = address.into();
        if !address.is_empty() {
            self.emails.push(UserEmail {
                address,
                is_primary,
            });
        }
        self
    }
}

/// Payload for resources of a role-trait type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleTrait {
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub profile: AttributeSet,
}

impl RoleTrait {
    /// Create a role trait with the given profile.
    pub fn new(profile: AttributeSet) -> Self {
        Self { profile }
    }
}

/// A node in the governance graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Identifier of this resource.
    pub id: ResourceId,

    /// Display name.
    pub display_name: String,

    /// Parent resource, if this resource is listed as a child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,

    /// Resource types listable underneath this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_resource_types: Vec<String>,

    /// User trait payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_trait: Option<UserTrait>,

    /// Role trait payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_trait: Option<RoleTrait>,
}

impl Resource {
    /// Create a plain resource.
    pub fn new(
        display_name: impl Into<String>,
        resource_type: &ResourceType,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: ResourceId::new(resource_type.id.clone(), id),
            display_name: display_name.into(),
            parent_id: None,
            child_resource_types: Vec::new(),
            user_trait: None,
            role_trait: None,
        }
    }

    /// Attach a parent resource.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<&ResourceId>) -> Self {
        self.parent_id = parent.cloned();
        self
    }

    /// Declare a child resource type.
    #[must_use]
    pub fn with_child_type(mut self, resource_type: &ResourceType) -> Self {
        self.child_resource_types.push(resource_type.id.clone());
        self
    }

    /// Attach a user trait.
    #[must_use]
    pub fn with_user_trait(mut self, user_trait: UserTrait) -> Self {
        self.user_trait = Some(user_trait);
        self
    }

    /// Attach a role trait.
    #[must_use]
    pub fn with_role_trait(mut self, role_trait: RoleTrait) -> Self {
        self.role_trait = Some(role_trait);
        self
    }
}

/// Purpose of an entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementPurpose {
    /// Membership style entitlement: the principal is assigned to the resource.
    #[default]
    Assignment,
    /// Permission style entitlement.
    Permission,
}

/// A named permission grantable on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Identifier in the form `{resource_type}:{resource}:{slug}`.
    pub id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Resource type ids of principals that can hold this entitlement.
    pub grantable_to: Vec<String>,
    #[serde(default)]
    pub purpose: EntitlementPurpose,
}

impl Entitlement {
    /// Create an assignment entitlement on a resource.
    pub fn assignment(resource: &Resource, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id: entitlement_id(&resource.id, &slug),
            resource: resource.id.clone(),
            display_name: slug.clone(),
            slug,
            description: String::new(),
            grantable_to: Vec::new(),
            purpose: EntitlementPurpose::Assignment,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the principal types that can be granted this entitlement.
    #[must_use]
    pub fn with_grantable_to(mut self, resource_types: &[&ResourceType]) -> Self {
        self.grantable_to = resource_types.iter().map(|rt| rt.id.clone()).collect();
        self
    }
}

/// An assignment of an entitlement to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Identifier in the form `{entitlement_id}:{principal_type}:{principal_id}`.
    pub id: String,
    pub entitlement_id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub principal: ResourceId,
}

impl Grant {
    /// Grant the `slug` entitlement on `resource` to `principal`.
    pub fn new(resource: &Resource, slug: impl Into<String>, principal: ResourceId) -> Self {
        let slug = slug.into();
        let entitlement_id = entitlement_id(&resource.id, &slug);
        Self {
            id: format!(
                "{}:{}:{}",
                entitlement_id, principal.resource_type, principal.resource
            ),
            entitlement_id,
            resource: resource.id.clone(),
            slug,
            principal,
        }
    }
}

fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{}:{}:{}", resource.resource_type, resource.resource, slug)
}

/// One page of results from a syncer operation.
///
/// An empty `next_token` means there are no more pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: String,
}

impl<T> Page<T> {
    /// A page with no items and no continuation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_token: String::new(),
        }
    }

    /// A page of items with a continuation token.
    pub fn new(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: next_token.into(),
        }
    }

    /// Whether this is the final page.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_token.is_empty()
    }
}
