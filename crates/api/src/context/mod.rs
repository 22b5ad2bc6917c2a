//! Application context (dependency injection)
//!
//! Wires the HTTP transport, token session, request executor, typed
//! command surface, and result-size guard together from one configuration.

use std::sync::Arc;
use std::time::Duration;

use catc_domain::{CatcConfig, Result};
use catc_infra::api::{
    ApiCommands, CatalystClient, CatalystClientConfig, GuardConfig, ResultSizeGuard,
    TokenSession,
};
use catc_infra::http::HttpClient;

/// Shared application state for the callable operations
pub struct AppContext {
    pub config: CatcConfig,
    pub commands: Arc<ApiCommands>,
    pub guard: Arc<ResultSizeGuard>,
}

impl AppContext {
    /// Build the full dependency graph from a configuration.
    pub fn new(config: CatcConfig) -> Result<Self> {
        let host = config.normalized_host();

        let mut http_builder = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("catc/", env!("CARGO_PKG_VERSION")));
        if config.accept_invalid_certs {
            http_builder = http_builder.accept_invalid_certs(true);
        }
        let http = Arc::new(http_builder.build()?);

        let session = Arc::new(TokenSession::new(
            Arc::clone(&http),
            host.clone(),
            config.username.clone(),
            config.password.clone(),
        ));

        let client = Arc::new(CatalystClient::new(
            http,
            session,
            CatalystClientConfig { base_url: host, caller_id: config.caller_id.clone() },
        ));

        let commands = Arc::new(ApiCommands::new(client));
        let guard =
            Arc::new(ResultSizeGuard::new(Arc::clone(&commands), GuardConfig::default()));

        Ok(Self { config, commands, guard })
    }
}
