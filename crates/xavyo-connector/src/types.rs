//! Connector Framework type definitions
//!
//! Enums describing resource traits and user account state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait a resource type carries in the governance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTrait {
    /// Resources of this type are principals (humans or machines).
    User,
    /// Resources of this type are roles.
    Role,
    /// Resources of this type are groups.
    Group,
    /// Resources of this type are applications.
    App,
}

impl ResourceTrait {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceTrait::User => "user",
            ResourceTrait::Role => "role",
            ResourceTrait::Group => "group",
            ResourceTrait::App => "app",
        }
    }
}

impl fmt::Display for ResourceTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceTrait {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ResourceTrait::User),
            "role" => Ok(ResourceTrait::Role),
            "group" => Ok(ResourceTrait::Group),
            "app" => Ok(ResourceTrait::App),
            _ => Err(ParseTypeError::new("resource trait", s, "user, role, group, app")),
        }
    }
}

/// Status reported for a user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// The target system does not report a status.
    #[default]
    Unspecified,
    /// The account can sign in.
    Enabled,
    /// The account is disabled.
    Disabled,
    /// The account is deleted.
    Deleted,
}

impl UserStatus {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Unspecified => "unspecified",
            UserStatus::Enabled => "enabled",
            UserStatus::Disabled => "disabled",
            UserStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unspecified" => Ok(UserStatus::Unspecified),
            "enabled" => Ok(UserStatus::Enabled),
            "disabled" => Ok(UserStatus::Disabled),
            "deleted" => Ok(UserStatus::Deleted),
            _ => Err(ParseTypeError::new(
                "user status",
                s,
                "unspecified, enabled, disabled, deleted",
            )),
        }
    }
}

/// Kind of account behind a user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Not reported by the target system.
    #[default]
    Unspecified,
    /// Interactive human account.
    Human,
    /// Non-interactive service account.
    Service,
    /// Built-in system account.
    System,
}

impl AccountType {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Unspecified => "unspecified",
            AccountType::Human => "human",
            AccountType::Service => "service",
            AccountType::System => "system",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unspecified" => Ok(AccountType::Unspecified),
            "human" => Ok(AccountType::Human),
            "service" => Ok(AccountType::Service),
            "system" => Ok(AccountType::System),
            _ => Err(ParseTypeError::new(
                "account type",
                s,
                "unspecified, human, service, system",
            )),
        }
    }
}

/// Error parsing one of the framework enums from a string.
#[derive(Debug, Clone)]
pub struct ParseTypeError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseTypeError {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', expected one of: {}",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseTypeError {}
