//! Request executor for the Catalyst Center API
//!
//! Issues one authenticated call and applies the per-class recovery policy:
//! an expired session (401) is re-established and the request reissued
//! once; a data-not-ready rejection (code 14006) is reissued once with the
//! server-suggested end time; a range-too-old rejection (code 14013) fails
//! immediately. Recovery attempts never compound: the reissued request is
//! classified strictly, and any failure it produces is fatal.

use std::sync::Arc;

use catc_domain::constants::{
    AUTH_TOKEN_HEADER, CALLER_ID_HEADER, CODE_DATA_NOT_READY, CODE_RANGE_TOO_OLD,
};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::{excerpt, ApiError};
use crate::http::HttpClient;

/// Configuration for the request executor
#[derive(Debug, Clone)]
pub struct CatalystClientConfig {
    /// Base URL of the Catalyst Center host
    pub base_url: String,
    /// Value sent as `X-CALLER-ID` on client-data endpoints
    pub caller_id: String,
}

/// A single API request: method, absolute path, query parameters
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Attach `X-CALLER-ID` (client-data endpoints carry it for audit)
    pub caller_id: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::GET, path: path.into(), query: Vec::new(), caller_id: false }
    }

    pub fn with_query(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_caller_id(mut self) -> Self {
        self.caller_id = true;
        self
    }

    /// Replace an existing query parameter, or append it if absent.
    /// Used to substitute the server-suggested end time on a reissue.
    pub fn set_param(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.query.push((key.to_string(), value)),
        }
    }
}

/// Classified outcome of one HTTP attempt
#[derive(Debug)]
enum ApiOutcome {
    Success(Value),
    AuthExpired,
    DataNotReady(Option<i64>),
    RangeTooOld(String),
    NotFound(String),
    Other(u16, String),
}

/// Request executor with credential recovery
pub struct CatalystClient {
    http: Arc<HttpClient>,
    auth: Arc<dyn AccessTokenProvider>,
    config: CatalystClientConfig,
}

impl CatalystClient {
    pub fn new(
        http: Arc<HttpClient>,
        auth: Arc<dyn AccessTokenProvider>,
        config: CatalystClientConfig,
    ) -> Self {
        Self { http, auth, config }
    }

    /// Execute a request, returning the parsed JSON payload.
    ///
    /// At most one recovery attempt is made per call, and only for the
    /// failure class of the first attempt.
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        match self.attempt(&request).await? {
            ApiOutcome::Success(payload) => Ok(payload),

            ApiOutcome::AuthExpired => {
                debug!("session rejected with 401; re-authenticating and reissuing once");
                self.auth.invalidate().await;
                let outcome = self.attempt(&request).await?;
                settle_retry(outcome, "the session was rejected with 401 and re-established")
            }

            ApiOutcome::DataNotReady(Some(suggested_end)) => {
                warn!(
                    suggested_end,
                    "data not ready for requested end time; reissuing with the suggested bound"
                );
                request.set_param("endTime", suggested_end.to_string());
                let outcome = self.attempt(&request).await?;
                settle_retry(
                    outcome,
                    "the request was reissued with the server-suggested end time",
                )
            }

            ApiOutcome::DataNotReady(None) => Err(ApiError::DataNotReady(
                "the server reported data-not-ready but no suggested end time could be \
                 extracted from its error message"
                    .to_string(),
            )),

            ApiOutcome::RangeTooOld(message) => Err(ApiError::RangeTooOld(message)),
            ApiOutcome::NotFound(message) => Err(ApiError::NotFound(message)),
            ApiOutcome::Other(status, body) => Err(ApiError::Api { status, body }),
        }
    }

    /// Issue one HTTP attempt and classify the response.
    async fn attempt(&self, request: &ApiRequest) -> Result<ApiOutcome, ApiError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}{}", self.config.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(AUTH_TOKEN_HEADER, token)
            .header("Accept", "application/json");

        if request.caller_id {
            builder = builder.header(CALLER_ID_HEADER, &self.config.caller_id);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response =
            self.http.send(builder).await.map_err(|err| ApiError::Network(err.to_string()))?;

        classify(response).await
    }
}

async fn classify(response: Response) -> Result<ApiOutcome, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Ok(ApiOutcome::AuthExpired);
    }

    if status == StatusCode::NOT_FOUND {
        let body = response.text().await.unwrap_or_default();
        return Ok(ApiOutcome::NotFound(excerpt(&body)));
    }

    if status.is_success() {
        let payload = response.json::<Value>().await.map_err(|err| {
            ApiError::Validation(format!("failed to parse response body as JSON: {err}"))
        })?;
        return Ok(ApiOutcome::Success(payload));
    }

    let body = response.text().await.unwrap_or_default();

    if status == StatusCode::BAD_REQUEST {
        if let Some((code, message)) = extract_error_code(&body) {
            if code == CODE_RANGE_TOO_OLD {
                return Ok(ApiOutcome::RangeTooOld(message));
            }
            if code == CODE_DATA_NOT_READY {
                return Ok(ApiOutcome::DataNotReady(extract_suggested_end_time(&message)));
            }
        }
    }

    Ok(ApiOutcome::Other(status.as_u16(), excerpt(&body)))
}

/// Map the outcome of a reissued request. Success returns the payload;
/// every failure is fatal and names both the original failure and the
/// retry's, so callers can see what was attempted.
fn settle_retry(outcome: ApiOutcome, recovery: &str) -> Result<Value, ApiError> {
    match outcome {
        ApiOutcome::Success(payload) => Ok(payload),
        ApiOutcome::AuthExpired => Err(ApiError::SessionExpired(format!(
            "{recovery}, but the reissued request was rejected with 401 as well"
        ))),
        ApiOutcome::DataNotReady(_) => Err(ApiError::DataNotReady(format!(
            "{recovery}, but the reissued request was rejected with data-not-ready as well"
        ))),
        ApiOutcome::RangeTooOld(message) => Err(ApiError::RangeTooOld(format!(
            "{recovery}, but the reissued request was rejected: {message}"
        ))),
        ApiOutcome::NotFound(message) => Err(ApiError::NotFound(format!(
            "{recovery}, but the reissued request was rejected: {message}"
        ))),
        ApiOutcome::Other(status, body) => Err(ApiError::Api {
            status,
            body: format!("{recovery}, but the reissued request failed: {body}"),
        }),
    }
}

/// Pull the application error code and message out of a 400 body.
///
/// Catalyst wraps errors either as `{"response": {"errorCode": N, ...}}`
/// or with the fields at the top level; both are accepted.
fn extract_error_code(body: &str) -> Option<(i64, String)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let inner = value.get("response").unwrap_or(&value);

    let code = inner.get("errorCode").and_then(Value::as_i64)?;
    let message = inner
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| inner.get("detail").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Some((code, message))
}

static SUGGESTED_END_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"endTime[^0-9]*(\d{10,16})").expect("end time pattern compiles"));

/// Extract the server-suggested end time from a data-not-ready message,
/// e.g. "... please use endTime=1700000000000 or earlier".
fn extract_suggested_end_time(message: &str) -> Option<i64> {
    SUGGESTED_END_TIME.captures(message)?.get(1)?.as_str().parse().ok()
}
