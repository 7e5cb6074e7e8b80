//! Error types for the Quick MD Helper domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Provider failures have their own enum so a caller can tell a transport
//! failure apart from a bad request made by the user.

use thiserror::Error;

/// The top-level error type for Quick MD Helper operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Input errors ---
    #[error("Invalid case: {0}")]
    InvalidCase(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a single call to the remote completion endpoint.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Short machine-readable kind, used in history entries and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiError { .. } => "api_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
        }
    }
}
