//! SentinelOne API records and the response envelope.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_items: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_cursor: String,
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

impl ApiError {
    /// Whether the code is in the 401xxxx or 403xxxx range.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code / 10_000, 401 | 403)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.code)?;
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

/// Only the error part of a response; read before the data is decoded.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

/// Full list response: `{ pagination, errors, data }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub data: Option<T>,
}

/// `data` of the sites endpoint, which nests the records one level deeper.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SitesData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sites: Vec<Site>,
}

/// Level at which a user's role assignment applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserScope {
    Account,
    Site,
    Tenant,
    #[default]
    #[serde(other)]
    Unknown,
}

impl UserScope {
    /// Wire value of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserScope::Account => "account",
            UserScope::Site => "site",
            UserScope::Tenant => "tenant",
            UserScope::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRole {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role_id: Option<String>,
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    account_name: Option<String>,
}

/// A role as returned by the API.
///
/// Predefined roles (from `rbac/roles`) and scope roles (embedded in users)
/// share one wire shape. A record whose `roleName` and `roleId` are both
/// non-empty is scope-bound; anything else is read as predefined.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRole")]
pub enum Role {
    Predefined {
        id: String,
        name: String,
    },
    ScopeBound {
        role_id: String,
        role_name: String,
        account_name: String,
    },
}

impl From<RawRole> for Role {
    fn from(raw: RawRole) -> Self {
        let role_id = raw.role_id.unwrap_or_default();
        let role_name = raw.role_name.unwrap_or_default();
        if !role_id.is_empty() && !role_name.is_empty() {
            Role::ScopeBound {
                role_id,
                role_name,
                account_name: raw.account_name.unwrap_or_default(),
            }
        } else {
            Role::Predefined {
                id: raw.id.unwrap_or_default(),
                name: raw.name.unwrap_or_default(),
            }
        }
    }
}

impl Role {
    /// Identifier used for the role resource.
    pub fn id(&self) -> &str {
        match self {
            Role::Predefined { id, .. } => id,
            Role::ScopeBound { role_id, .. } => role_id,
        }
    }

    /// Display name used for the role resource.
    pub fn name(&self) -> &str {
        match self {
            Role::Predefined { name, .. } => name,
            Role::ScopeBound { role_name, .. } => role_name,
        }
    }

    /// Account a scope role belongs to.
    pub fn account_name(&self) -> Option<&str> {
        match self {
            Role::Predefined { .. } => None,
            Role::ScopeBound { account_name, .. } => {
                Some(account_name.as_str()).filter(|n| !n.is_empty())
            }
        }
    }
}

/// Console user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: UserScope,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope_roles: Vec<Role>,
}

/// API-only service user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUser {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: UserScope,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope_roles: Vec<Role>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
}
