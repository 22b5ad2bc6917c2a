//! Shared helpers for infra integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use catc_domain::types::TimeRange;
use catc_infra::api::{
    AccessTokenProvider, ApiCommands, ApiError, CatalystClient, CatalystClientConfig,
    GuardConfig, ResultSizeGuard,
};
use catc_infra::http::HttpClient;

/// Token provider that steps through a fixed token list, advancing on each
/// invalidation. Keeps HTTP call counts free of auth-endpoint traffic so
/// tests can assert exact request counts against the data endpoints.
pub struct RotatingTokenProvider {
    tokens: Vec<String>,
    cursor: AtomicUsize,
    invalidations: AtomicUsize,
}

impl RotatingTokenProvider {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
            cursor: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
        }
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenProvider for RotatingTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        let idx = self.cursor.load(Ordering::SeqCst).min(self.tokens.len() - 1);
        Ok(self.tokens[idx].clone())
    }

    async fn invalidate(&self) {
        self.cursor.fetch_add(1, Ordering::SeqCst);
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn commands_with(
    base_url: &str,
    provider: Arc<RotatingTokenProvider>,
) -> Arc<ApiCommands> {
    let http = Arc::new(HttpClient::new().expect("http client"));
    let client = Arc::new(CatalystClient::new(
        http,
        provider,
        CatalystClientConfig { base_url: base_url.to_string(), caller_id: "test-caller".to_string() },
    ));
    Arc::new(ApiCommands::new(client))
}

pub fn guard_with(base_url: &str, provider: Arc<RotatingTokenProvider>) -> ResultSizeGuard {
    ResultSizeGuard::new(commands_with(base_url, provider), GuardConfig::default())
}

/// A fixed one-hour window; tests that exercise the retry paths only care
/// that the bounds are stable epoch milliseconds.
pub fn test_range() -> TimeRange {
    TimeRange {
        start_epoch_ms: 1_700_000_000_000 - 3_600_000,
        end_epoch_ms: 1_700_000_000_000,
        adjusted_for_floor: false,
    }
}
