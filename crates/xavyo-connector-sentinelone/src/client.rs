//! SentinelOne management API client.
//!
//! Read-only GET access to the list endpoints. Every call issues exactly one
//! request; there is no retry, rate limiting or request timeout. Callers
//! cancel an in-flight request by dropping its future.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SentinelOneConfig;
use crate::error::{SentinelOneError, SentinelOneResult};
use crate::models::{Account, ApiEnvelope, ErrorEnvelope, Role, ServiceUser, Site, SitesData, User};

pub const USERS_ENDPOINT: &str = "users";
pub const SERVICE_USERS_ENDPOINT: &str = "service-users";
pub const ACCOUNTS_ENDPOINT: &str = "accounts";
pub const SITES_ENDPOINT: &str = "sites";
pub const ROLES_ENDPOINT: &str = "rbac/roles";

/// Query parameters for a list request.
///
/// `skipCount=true` is always sent; an empty cursor is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    cursor: Option<String>,
    accounts_filter: Option<String>,
    roles_filter: Option<String>,
    sites_filter: Option<String>,
    limit: Option<u32>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from a cursor returned by a previous page.
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        self.cursor = (!cursor.is_empty()).then_some(cursor);
        self
    }

    #[must_use]
    pub fn accounts_filter(mut self, account_id: impl Into<String>) -> Self {
        self.accounts_filter = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn roles_filter(mut self, role_id: impl Into<String>) -> Self {
        self.roles_filter = Some(role_id.into());
        self
    }

    #[must_use]
    pub fn sites_filter(mut self, site_id: impl Into<String>) -> Self {
        self.sites_filter = Some(site_id.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string pairs in request order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(id) = &self.accounts_filter {
            pairs.push(("accountsFilter", id.clone()));
        }
        if let Some(id) = &self.roles_filter {
            pairs.push(("rolesFilter", id.clone()));
        }
        if let Some(id) = &self.sites_filter {
            pairs.push(("sitesFilter", id.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs.push(("skipCount", "true".to_string()));
        pairs
    }
}

/// One page of records and the cursor for the next one (empty on the last page).
#[derive(Debug, Clone)]
pub struct ApiPage<T> {
    pub records: Vec<T>,
    pub next_cursor: String,
}

/// SentinelOne management API client.
pub struct SentinelOneClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: String,
}

impl std::fmt::Debug for SentinelOneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentinelOneClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SentinelOneClient {
    /// Creates a client for the configured management console.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &SentinelOneConfig) -> SentinelOneResult<Self> {
        config.check()?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connection.connection_timeout())
            .pool_max_idle_per_host(config.connection.pool_size)
            .build()
            .map_err(|e| SentinelOneError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url()?,
            api_token: config.api_token.clone(),
        })
    }

    /// Returns the API base URL (ending in `/web/api/v2.1/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Console users.
    #[instrument(skip(self))]
    pub async fn get_users(&self, params: &QueryParams) -> SentinelOneResult<ApiPage<User>> {
        self.get_list(USERS_ENDPOINT, "failed to get users", params)
            .await
    }

    /// Service users.
    #[instrument(skip(self))]
    pub async fn get_service_users(
        &self,
        params: &QueryParams,
    ) -> SentinelOneResult<ApiPage<ServiceUser>> {
        self.get_list(SERVICE_USERS_ENDPOINT, "failed to get service users", params)
            .await
    }

    /// Accounts.
    #[instrument(skip(self))]
    pub async fn get_accounts(&self, params: &QueryParams) -> SentinelOneResult<ApiPage<Account>> {
        self.get_list(ACCOUNTS_ENDPOINT, "failed to get accounts", params)
            .await
    }

    /// Sites. The records are nested under `data.sites`.
    #[instrument(skip(self))]
    pub async fn get_sites(&self, params: &QueryParams) -> SentinelOneResult<ApiPage<Site>> {
        let (data, next_cursor) = self
            .get::<SitesData>(SITES_ENDPOINT, "failed to get sites", params)
            .await?;
        Ok(ApiPage {
            records: data.sites,
            next_cursor,
        })
    }

    /// Predefined RBAC roles.
    #[instrument(skip(self))]
    pub async fn get_predefined_roles(
        &self,
        params: &QueryParams,
    ) -> SentinelOneResult<ApiPage<Role>> {
        self.get_list(ROLES_ENDPOINT, "failed to get roles", params)
            .await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        operation: &str,
        params: &QueryParams,
    ) -> SentinelOneResult<ApiPage<T>> {
        let (records, next_cursor) = self.get::<Vec<T>>(endpoint, operation, params).await?;
        Ok(ApiPage {
            records,
            next_cursor,
        })
    }

    /// Performs a GET and decodes the envelope.
    ///
    /// The body is read even on error statuses so that an in-band `errors`
    /// array is reported in preference to the bare status.
    async fn get<T: DeserializeOwned + Default>(
        &self,
        endpoint: &str,
        operation: &str,
        params: &QueryParams,
    ) -> SentinelOneResult<(T, String)> {
        let url = self.base_url.join(endpoint)?;

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("ApiToken {}", self.api_token))
            .query(&params.to_pairs())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "Received response");

        let in_band = match serde_json::from_slice::<ErrorEnvelope>(&body) {
            Ok(envelope) => envelope.errors.unwrap_or_default(),
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => Vec::new(),
        };

        if !in_band.is_empty() {
            return Err(SentinelOneError::Api {
                operation: operation.to_string(),
                errors: in_band,
            });
        }

        if !status.is_success() {
            return Err(SentinelOneError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)?;
        let next_cursor = envelope
            .pagination
            .map(|p| p.next_cursor)
            .unwrap_or_default();

        Ok((envelope.data.unwrap_or_default(), next_cursor))
    }
}
