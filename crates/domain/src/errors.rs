//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Catalyst Center client
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CatcError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Time range outside retention window: {0}")]
    RangeTooOld(String),

    #[error("Data not ready: {0}")]
    DataNotReady(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Catalyst Center client operations
pub type Result<T> = std::result::Result<T, CatcError>;
