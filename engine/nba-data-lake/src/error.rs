//! Error types for the data lake setup

use thiserror::Error;

/// Result type alias for data lake operations
pub type Result<T> = std::result::Result<T, LakeError>;

/// Errors that can occur while provisioning the data lake
#[derive(Error, Debug)]
pub enum LakeError {
    /// A required environment setting was not provided
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    /// Transport-level HTTP failure (connect, TLS, body read, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Object storage rejected or failed the write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catalog (Glue) call failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Query service (Athena) call failed
    #[error("Query service error: {0}")]
    Query(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),
}

impl LakeError {
    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new query service error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a new already exists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Whether the error means the target was already provisioned
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}
