//! Connector Framework error types
//!
//! Error definitions with transient/permanent classification.

use thiserror::Error;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Connection errors (usually transient)
    /// Failed to establish connection to target system.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error during communication.
    #[error("network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Authentication errors (permanent)
    /// The target system rejected the credentials.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // Configuration errors (permanent)
    /// Connector configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Operation errors
    /// Operation failed.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid data format returned by the target system.
    #[error("invalid data: {message}")]
    InvalidData {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Traversal errors
    /// The page token could not be decoded.
    #[error("invalid page token: {message}")]
    InvalidPageToken { message: String },

    /// A page token frame named a resource type the syncer does not traverse.
    #[error("unexpected resource type '{resource_type}' while {operation}")]
    UnexpectedResourceType {
        resource_type: String,
        operation: String,
    },

    /// No syncer is registered for a resource type.
    #[error("no resource syncer registered for resource type '{resource_type}'")]
    ResourceSyncerNotFound { resource_type: String },

    /// A syncer handed back the token it was called with.
    #[error("pagination stalled while {operation}: token was not advanced")]
    PaginationStalled { operation: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Check if this error is transient.
    ///
    /// Nothing in the framework retries; the classification is surfaced so
    /// the caller that owns the sync schedule can decide.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectorError::ConnectionFailed { .. } | ConnectorError::NetworkError { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::NetworkError { .. } => "NETWORK_ERROR",
            ConnectorError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::OperationFailed { .. } => "OPERATION_FAILED",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::InvalidPageToken { .. } => "INVALID_PAGE_TOKEN",
            ConnectorError::UnexpectedResourceType { .. } => "UNEXPECTED_RESOURCE_TYPE",
            ConnectorError::ResourceSyncerNotFound { .. } => "RESOURCE_SYNCER_NOT_FOUND",
            ConnectorError::PaginationStalled { .. } => "PAGINATION_STALLED",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        ConnectorError::OperationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an authentication failed error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        ConnectorError::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create an invalid data error with source.
    pub fn invalid_data_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::InvalidData {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unexpected resource type error.
    pub fn unexpected_resource_type(
        resource_type: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        ConnectorError::UnexpectedResourceType {
            resource_type: resource_type.into(),
            operation: operation.into(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
