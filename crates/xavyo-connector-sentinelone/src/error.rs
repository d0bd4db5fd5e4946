//! Error types for the SentinelOne connector.

use thiserror::Error;
use xavyo_connector::error::ConnectorError;

use crate::models::ApiError;

/// Result type alias using `SentinelOneError`.
pub type SentinelOneResult<T> = Result<T, SentinelOneError>;

/// Errors that can occur when interacting with the SentinelOne management API.
#[derive(Debug, Error)]
pub enum SentinelOneError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API reported errors in the response body.
    #[error("{operation}: {}", format_api_errors(.errors))]
    Api {
        operation: String,
        errors: Vec<ApiError>,
    },

    /// Non-success status without an error body.
    #[error("{operation}: unexpected HTTP status {status}")]
    Status { operation: String, status: u16 },

    /// A validation probe against an endpoint failed.
    #[error("{}", validation_message(.endpoint, .source))]
    Validation {
        endpoint: String,
        #[source]
        source: Box<SentinelOneError>,
    },

    /// An error annotated with the operation and resource it occurred in.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SentinelOneError>,
    },
}

impl SentinelOneError {
    /// Wrap the error with a description of the failed operation.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        SentinelOneError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &SentinelOneError {
        match self {
            SentinelOneError::Context { source, .. }
            | SentinelOneError::Validation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the API rejected the token or its permissions.
    pub fn is_auth_failure(&self) -> bool {
        match self.root() {
            SentinelOneError::Status { status, .. } => matches!(status, 401 | 403),
            SentinelOneError::Api { errors, .. } => errors.iter().any(ApiError::is_auth_failure),
            _ => false,
        }
    }

    fn into_root(self) -> SentinelOneError {
        match self {
            SentinelOneError::Context { source, .. }
            | SentinelOneError::Validation { source, .. } => source.into_root(),
            other => other,
        }
    }
}

// Api and Status errors already name the endpoint they were reading.
fn validation_message(endpoint: &str, source: &SentinelOneError) -> String {
    match source {
        SentinelOneError::Api { .. } | SentinelOneError::Status { .. } => source.to_string(),
        other => format!("failed to get {endpoint}: {other}"),
    }
}

fn format_api_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<SentinelOneError> for ConnectorError {
    fn from(err: SentinelOneError) -> Self {
        let message = err.to_string();
        if err.is_auth_failure() {
            return ConnectorError::authentication_failed(message);
        }
        match err.into_root() {
            SentinelOneError::Config(_) | SentinelOneError::Url(_) => {
                ConnectorError::InvalidConfiguration { message }
            }
            SentinelOneError::Http(e) if e.is_connect() => ConnectorError::ConnectionFailed {
                message,
                source: Some(Box::new(e)),
            },
            SentinelOneError::Http(e) => ConnectorError::network_with_source(message, e),
            SentinelOneError::Json(e) => ConnectorError::invalid_data_with_source(message, e),
            _ => ConnectorError::operation_failed(message),
        }
    }
}
