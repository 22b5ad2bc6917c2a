//! API-specific error types
//!
//! Classifies Catalyst Center failure modes for the recovery policy.

use catc_domain::CatcError;
use thiserror::Error;

/// Categories of API errors, grouped by how the executor reacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Token exchange failed - fatal, never retried
    Authentication,
    /// 401 on a data call - recovered once via re-authentication
    SessionExpired,
    /// Code 14013 - caller input error, never retried
    RangeTooOld,
    /// Code 14006 - recovered once with the server-suggested end time
    DataNotReady,
    /// 404 - fatal
    NotFound,
    /// Malformed input or unexpected response shape - fatal
    Validation,
    /// Any other non-success status - fatal
    Api,
    /// Transport failure - fatal (no transport-level retry loop)
    Network,
    /// Configuration error - fatal
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Time range outside retention window: {0}")]
    RangeTooOld(String),

    #[error("Data not ready: {0}")]
    DataNotReady(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::SessionExpired(_) => ApiErrorCategory::SessionExpired,
            Self::RangeTooOld(_) => ApiErrorCategory::RangeTooOld,
            Self::DataNotReady(_) => ApiErrorCategory::DataNotReady,
            Self::NotFound(_) => ApiErrorCategory::NotFound,
            Self::Validation(_) => ApiErrorCategory::Validation,
            Self::Api { .. } => ApiErrorCategory::Api,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether the executor may transparently recover from this failure.
    /// At most one recovery attempt is ever made, and never across classes.
    pub fn recoverable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::SessionExpired | ApiErrorCategory::DataNotReady
        )
    }
}

/// Convert into the application-wide domain error
impl From<ApiError> for CatcError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(msg) | ApiError::SessionExpired(msg) => Self::Auth(msg),
            ApiError::RangeTooOld(msg) => Self::RangeTooOld(msg),
            ApiError::DataNotReady(msg) => Self::DataNotReady(msg),
            ApiError::NotFound(msg) => Self::NotFound(msg),
            ApiError::Validation(msg) => Self::InvalidInput(msg),
            ApiError::Api { status, body } => Self::Api { status, body },
            ApiError::Network(msg) => Self::Network(msg),
            ApiError::Config(msg) => Self::Config(msg),
        }
    }
}

/// Bound a response body for inclusion in error messages.
pub(crate) fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
