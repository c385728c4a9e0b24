//! Error types for chartreq

use thiserror::Error;

/// Result type alias for chartreq operations
pub type ExploreResult<T> = Result<T, ExploreError>;

/// Error types for explore request building and submission
#[derive(Debug, Error)]
pub enum ExploreError {
    /// The form data carries no datasource
    #[error("Form data has no datasource")]
    MissingDatasource,

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// URL parse or build error
    #[error("Url error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[cfg(feature = "client")]
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ExploreError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a missing-datasource error
    pub fn is_missing_datasource(&self) -> bool {
        matches!(self, Self::MissingDatasource)
    }
}
