//! Session management for the Catalyst Center token exchange
//!
//! Catalyst Center issues an opaque token from a basic-auth POST; the token
//! is then attached to every data call as `X-Auth-Token`. The session holds
//! the one cached credential and guarantees that concurrent cold-cache
//! callers observe a single exchange.

use std::sync::Arc;

use async_trait::async_trait;
use catc_domain::constants::SYSTEM_API_ROOT;
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::errors::{excerpt, ApiError};
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, performing the exchange if none is cached.
    async fn access_token(&self) -> Result<String, ApiError>;

    /// Discard any cached credential; the next access performs a fresh
    /// exchange.
    async fn invalidate(&self);
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: Option<String>,
}

/// Token session backed by the Catalyst Center auth endpoint
pub struct TokenSession {
    http: Arc<HttpClient>,
    base_url: String,
    username: String,
    password: String,
    // The exchange runs while this lock is held: auth calls serialize, so
    // concurrent cold-cache callers share one exchange. Data calls never
    // take this lock beyond the cache read.
    cached: Mutex<Option<String>>,
}

impl TokenSession {
    pub fn new(
        http: Arc<HttpClient>,
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            cached: Mutex::new(None),
        }
    }

    async fn exchange(&self) -> Result<String, ApiError> {
        let url = format!("{}{}/auth/token", self.base_url, SYSTEM_API_ROOT);
        debug!(url = %url, "requesting auth token");

        let request = self
            .http
            .request(Method::POST, &url)
            .basic_auth(&self.username, Some(&self.password));

        let response =
            self.http.send(request).await.map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!(
                "token endpoint returned status {status}: {}",
                excerpt(&body)
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Auth(format!("failed to parse token response: {err}")))?;

        let token = parsed.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            ApiError::Auth("token endpoint response did not contain a Token field".to_string())
        })?;

        info!("authenticated with Catalyst Center");
        Ok(token)
    }
}

#[async_trait]
impl AccessTokenProvider for TokenSession {
    async fn access_token(&self) -> Result<String, ApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.exchange().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            debug!("cached credential invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn session(server: &MockServer) -> Arc<TokenSession> {
        let http = Arc::new(HttpClient::new().expect("http client"));
        Arc::new(TokenSession::new(http, server.uri(), "admin", "secret"))
    }

    #[tokio::test]
    async fn token_is_cached_after_first_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dna/system/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        assert_eq!(session.access_token().await.unwrap(), "abc");
        assert_eq!(session.access_token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn concurrent_cold_calls_share_one_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dna/system/api/v1/auth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Token": "abc"}))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.access_token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "abc");
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dna/system/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Token": "abc"})))
            .expect(2)
            .mount(&server)
            .await;

        let session = session(&server);
        session.access_token().await.unwrap();
        session.invalidate().await;
        session.access_token().await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dna/system/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = session(&server).access_token().await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn missing_token_field_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dna/system/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session": "abc"})))
            .mount(&server)
            .await;

        let err = session(&server).access_token().await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(err.to_string().contains("Token"));
    }
}
