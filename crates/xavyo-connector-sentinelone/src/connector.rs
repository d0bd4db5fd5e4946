//! SentinelOne connector.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};
use xavyo_connector::prelude::*;

use crate::client::{QueryParams, SentinelOneClient};
use crate::config::SentinelOneConfig;
use crate::error::{SentinelOneError, SentinelOneResult};
use crate::resources::{AccountSyncer, RoleSyncer, ServiceUserSyncer, SiteSyncer, UserSyncer};

/// Connector syncing SentinelOne accounts, users, service users, roles and sites.
#[derive(Debug)]
pub struct SentinelOneConnector {
    config: SentinelOneConfig,
    client: Arc<SentinelOneClient>,
}

impl SentinelOneConnector {
    /// Creates a connector for a validated configuration.
    pub fn new(config: SentinelOneConfig) -> SentinelOneResult<Self> {
        let client = SentinelOneClient::new(&config)?;
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// The configuration this connector was created with.
    pub fn config(&self) -> &SentinelOneConfig {
        &self.config
    }

    /// The shared API client.
    pub fn client(&self) -> &Arc<SentinelOneClient> {
        &self.client
    }

    /// Probe each endpoint with a one-record request.
    ///
    /// No role is documented as sufficient for every endpoint, so each one is
    /// checked separately. The first failure is returned.
    pub async fn probe(&self) -> SentinelOneResult<()> {
        let params = QueryParams::new().limit(1);

        self.client
            .get_accounts(&params)
            .await
            .map_err(|e| validation("accounts", e))?;
        self.client
            .get_sites(&params)
            .await
            .map_err(|e| validation("sites", e))?;
        self.client
            .get_users(&params)
            .await
            .map_err(|e| validation("users", e))?;
        self.client
            .get_service_users(&params)
            .await
            .map_err(|e| validation("service users", e))?;
        self.client
            .get_predefined_roles(&params)
            .await
            .map_err(|e| validation("roles", e))?;

        Ok(())
    }
}

fn validation(endpoint: &str, source: SentinelOneError) -> SentinelOneError {
    SentinelOneError::Validation {
        endpoint: endpoint.to_string(),
        source: Box::new(source),
    }
}

#[async_trait]
impl Connector for SentinelOneConnector {
    fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "SentinelOne".to_string(),
            description:
                "Connector syncing SentinelOne accounts, users, service users, roles and sites to xavyo."
                    .to_string(),
        }
    }

    #[instrument(skip(self))]
    async fn validate(&self) -> ConnectorResult<()> {
        self.probe().await?;
        info!(console = %self.config.management_console_url, "SentinelOne credentials validated");
        Ok(())
    }

    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(AccountSyncer::new(Arc::clone(&self.client))),
            Arc::new(UserSyncer::new(Arc::clone(&self.client))),
            Arc::new(ServiceUserSyncer::new(Arc::clone(&self.client))),
            Arc::new(RoleSyncer::new(Arc::clone(&self.client))),
            Arc::new(SiteSyncer::new(Arc::clone(&self.client))),
        ]
    }
}
