//! Configuration structures

use serde::{Deserialize, Serialize};

/// Connection settings for a Catalyst Center instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatcConfig {
    /// Base URL of the Catalyst Center host (e.g. "https://dnac.example.com")
    pub host: String,
    /// Username for the token exchange
    pub username: String,
    /// Password for the token exchange
    pub password: String,
    /// Value sent as `X-CALLER-ID` on client-data endpoints
    #[serde(default = "default_caller_id")]
    pub caller_id: String,
    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Disable TLS certificate validation. Off by default; only for lab
    /// instances with self-signed certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_caller_id() -> String {
    "catc".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CatcConfig {
    /// Trim a trailing slash so path concatenation stays predictable.
    pub fn normalized_host(&self) -> String {
        self.host.trim_end_matches('/').to_string()
    }
}
