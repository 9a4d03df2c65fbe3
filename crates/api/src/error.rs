//! Error types for the reward provider clients.

use thiserror::Error;

/// Errors that can occur when fetching reward data.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success HTTP status.
    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    /// Failed to parse a provider response body.
    #[error("Failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    /// Provider returned a well-formed payload reporting failure.
    #[error("{provider} reported failure status: {status}")]
    ProviderFailure {
        provider: &'static str,
        status: String,
    },

    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// High-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level failure.
    Network,
    /// The provider answered but reported or returned a failure.
    Provider,
    /// The response could not be interpreted.
    Data,
    /// Local configuration problem.
    Config,
}

impl ApiError {
    pub fn error_category(&self) -> ErrorCategory {
        match self {
            ApiError::Request(_) => ErrorCategory::Network,
            ApiError::Status { .. } | ApiError::ProviderFailure { .. } => ErrorCategory::Provider,
            ApiError::Parse { .. } => ErrorCategory::Data,
            ApiError::Url(_) => ErrorCategory::Config,
        }
    }

    /// Whether a later dispatch may succeed without local changes.
    ///
    /// The recency gate owns retry policy: a retryable error is simply
    /// retried on the next eligible dispatch.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Request(_) | ApiError::ProviderFailure { .. } => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            ApiError::Parse { .. } | ApiError::Url(_) => false,
        }
    }
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ApiError>;
