//! SentinelOne Connector for xavyo
//!
//! Read-only governance connector for the SentinelOne management API. It
//! mirrors accounts, sites, console users, service users and roles into
//! xavyo's resource, entitlement and grant graph.
//!
//! # Resource graph
//!
//! - `account` offers a `member` entitlement held by its users, service
//!   users and sites
//! - `site` offers a `member` entitlement held by its users and service users
//! - `role` offers one entitlement per assignment scope (`account scope`,
//!   `site scope`, `tenant scope`) held by users and service users
//! - `user` and `service_user` are principals listed under their account
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use xavyo_connector::syncer::Syncer;
//! use xavyo_connector_sentinelone::{SentinelOneConfig, SentinelOneConnector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SentinelOneConfig::builder()
//!     .api_token("your-api-token")
//!     .management_console_url("https://usea1.sentinelone.net")
//!     .build()?;
//!
//! let connector = Arc::new(SentinelOneConnector::new(config)?);
//! let report = Syncer::new(connector).run().await?;
//! println!("{} grants", report.grants.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod error;
mod models;
mod resources;

// Re-exports
pub use client::{
    ApiPage, QueryParams, SentinelOneClient, ACCOUNTS_ENDPOINT, ROLES_ENDPOINT,
    SERVICE_USERS_ENDPOINT, SITES_ENDPOINT, USERS_ENDPOINT,
};
pub use config::{
    SentinelOneConfig, SentinelOneConfigBuilder, API_TOKEN_VAR, MANAGEMENT_CONSOLE_URL_VAR,
};
pub use connector::SentinelOneConnector;
pub use error::{SentinelOneError, SentinelOneResult};
pub use models::{Account, ApiError, Pagination, Role, ServiceUser, Site, User, UserScope};
pub use resources::{
    account_resource, role_resource, service_user_resource, site_resource, split_full_name,
    user_resource, AccountSyncer, RoleSyncer, ServiceUserSyncer, SiteSyncer, UserSyncer,
    MEMBER_ENTITLEMENT,
};
