//! SentinelOne connector configuration.

use std::fmt;

use serde::Deserialize;
use url::Url;
use xavyo_connector::config::{ConnectionSettings, ConnectorConfig, REDACTED};
use xavyo_connector::error::{ConnectorError, ConnectorResult};

use crate::error::{SentinelOneError, SentinelOneResult};

/// Environment variable holding the API token.
pub const API_TOKEN_VAR: &str = "SENTINELONE_API_TOKEN";

/// Environment variable holding the management console URL.
pub const MANAGEMENT_CONSOLE_URL_VAR: &str = "SENTINELONE_MANAGEMENT_CONSOLE_URL";

const API_PATH: &str = "web/api/v2.1/";

/// Configuration for the SentinelOne connector.
#[derive(Clone, Deserialize)]
pub struct SentinelOneConfig {
    /// API token sent as `Authorization: ApiToken {token}`.
    pub api_token: String,

    /// Management console base URL, e.g. `https://usea1.sentinelone.net`.
    pub management_console_url: String,

    /// HTTP connection settings.
    #[serde(default)]
    pub connection: ConnectionSettings,
}

impl fmt::Debug for SentinelOneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentinelOneConfig")
            .field("api_token", &REDACTED)
            .field("management_console_url", &self.management_console_url)
            .field("connection", &self.connection)
            .finish()
    }
}

impl SentinelOneConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> SentinelOneConfigBuilder {
        SentinelOneConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> SentinelOneResult<Self> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// Missing variables are read as empty and rejected by validation.
    pub fn from_reader<F>(reader: F) -> SentinelOneResult<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        Self::builder()
            .api_token(reader(API_TOKEN_VAR).unwrap_or_default())
            .management_console_url(reader(MANAGEMENT_CONSOLE_URL_VAR).unwrap_or_default())
            .build()
    }

    /// Check required values and the console URL.
    pub fn check(&self) -> SentinelOneResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(SentinelOneError::Config(
                "api token must be provided".to_string(),
            ));
        }
        // The token is sent verbatim in the Authorization header.
        if self.api_token.chars().any(char::is_control) {
            return Err(SentinelOneError::Config(
                "api token contains control characters".to_string(),
            ));
        }
        if self.management_console_url.trim().is_empty() {
            return Err(SentinelOneError::Config(
                "management console url must be provided".to_string(),
            ));
        }

        let url = Url::parse(self.management_console_url.trim())?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(SentinelOneError::Config(format!(
                "unsupported management console url scheme: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(SentinelOneError::Config(
                "management console url has no host".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL of the v2.1 API: `{management_console_url}/web/api/v2.1/`.
    pub fn api_base_url(&self) -> SentinelOneResult<Url> {
        let console = self.management_console_url.trim().trim_end_matches('/');
        Ok(Url::parse(&format!("{console}/{API_PATH}"))?)
    }
}

impl ConnectorConfig for SentinelOneConfig {
    fn validate(&self) -> ConnectorResult<()> {
        self.check().map_err(ConnectorError::from)
    }

    fn get_credentials(&self) -> Vec<(&'static str, String)> {
        vec![("api_token", self.api_token.clone())]
    }

    fn redacted(&self) -> Self {
        Self {
            api_token: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

/// Builder for [`SentinelOneConfig`].
#[derive(Debug, Default)]
pub struct SentinelOneConfigBuilder {
    api_token: Option<String>,
    management_console_url: Option<String>,
    connection: ConnectionSettings,
}

impl SentinelOneConfigBuilder {
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn management_console_url(mut self, url: impl Into<String>) -> Self {
        self.management_console_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> SentinelOneResult<SentinelOneConfig> {
        let config = SentinelOneConfig {
            api_token: trimmed(self.api_token),
            management_console_url: trimmed(self.management_console_url),
            connection: self.connection,
        };
        config.check()?;
        Ok(config)
    }
}

// Values read from `.env` files or secret mounts often end in a newline.
fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn make_reader(
        vars: &[(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn test_from_reader() {
        let config = SentinelOneConfig::from_reader(make_reader(&[
            (API_TOKEN_VAR, "secret"),
            (MANAGEMENT_CONSOLE_URL_VAR, "https://usea1.sentinelone.net"),
        ]))
        .unwrap();

        assert_eq!(config.api_token, "secret");
        assert_eq!(config.connection, ConnectionSettings::default());
    }

    #[test]
    fn test_missing_token() {
        let err = SentinelOneConfig::from_reader(make_reader(&[(
            MANAGEMENT_CONSOLE_URL_VAR,
            "https://usea1.sentinelone.net",
        )]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: api token must be provided");
    }

    #[test]
    fn test_missing_url() {
        let err = SentinelOneConfig::from_reader(make_reader(&[(API_TOKEN_VAR, "secret")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: management console url must be provided"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = SentinelOneConfig::builder()
            .api_token("secret")
            .management_console_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SentinelOneError::Url(_)));

        let err = SentinelOneConfig::builder()
            .api_token("secret")
            .management_console_url("ftp://console.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, SentinelOneError::Config(_)));
    }

    #[test]
    fn test_api_base_url() {
        for console in [
            "https://usea1.sentinelone.net",
            "https://usea1.sentinelone.net/",
        ] {
            let config = SentinelOneConfig::builder()
                .api_token("secret")
                .management_console_url(console)
                .build()
                .unwrap();
            assert_eq!(
                config.api_base_url().unwrap().as_str(),
                "https://usea1.sentinelone.net/web/api/v2.1/"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let config = SentinelOneConfig::from_reader(make_reader(&[
            (API_TOKEN_VAR, "secret\n"),
            (MANAGEMENT_CONSOLE_URL_VAR, " https://usea1.sentinelone.net/\r\n"),
        ]))
        .unwrap();

        assert_eq!(config.api_token, "secret");
        assert_eq!(config.management_console_url, "https://usea1.sentinelone.net/");
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "https://usea1.sentinelone.net/web/api/v2.1/"
        );
    }

    #[test]
    fn test_control_characters_in_token_rejected() {
        let config = SentinelOneConfig {
            api_token: "sec\nret".to_string(),
            management_console_url: "https://usea1.sentinelone.net".to_string(),
            connection: ConnectionSettings::default(),
        };
        let err = config.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: api token contains control characters"
        );

        let err = ConnectorConfig::validate(&config).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidConfiguration { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_token_never_printed() {
        let config = SentinelOneConfig::builder()
            .api_token("super-secret-token")
            .management_console_url("https://usea1.sentinelone.net")
            .build()
            .unwrap();

        assert!(!format!("{config:?}").contains("super-secret-token"));
        assert_eq!(config.redacted().api_token, REDACTED);
        assert_eq!(
            config.get_credentials(),
            vec![("api_token", "super-secret-token".to_string())]
        );
        assert!(ConnectorConfig::validate(&config).is_ok());
    }
}
