//! Typed command surface over the Catalyst Center API
//!
//! One method per consumed endpoint. Inventory endpoints live under the
//! intent API root and return a `{"response": [...]}` envelope; client
//! telemetry lives under the data API root and carries the caller-id
//! header plus an epoch-millisecond time window.

use std::collections::BTreeMap;
use std::sync::Arc;

use catc_domain::constants::{DATA_API_ROOT, INTENT_API_ROOT};
use catc_domain::types::{ClientFilters, CountResult, Paging, TimeRange};
use serde_json::Value;
use tracing::debug;

use super::client::{ApiRequest, CatalystClient};
use super::errors::ApiError;

/// Typed operations against the Catalyst Center API
pub struct ApiCommands {
    client: Arc<CatalystClient>,
}

impl ApiCommands {
    pub fn new(client: Arc<CatalystClient>) -> Self {
        Self { client }
    }

    /// List network devices, applying the filter map verbatim.
    pub async fn network_devices(
        &self,
        filters: &BTreeMap<String, String>,
    ) -> Result<Vec<Value>, ApiError> {
        let query: Vec<(String, String)> =
            filters.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        let request =
            ApiRequest::get(format!("{INTENT_API_ROOT}/network-device")).with_query(query);
        let payload = self.client.execute(request).await?;
        response_list(&payload)
    }

    /// List sites.
    pub async fn sites(&self) -> Result<Vec<Value>, ApiError> {
        let request = ApiRequest::get(format!("{INTENT_API_ROOT}/site"));
        let payload = self.client.execute(request).await?;
        response_list(&payload)
    }

    /// List interfaces of one network device.
    pub async fn device_interfaces(&self, device_id: &str) -> Result<Vec<Value>, ApiError> {
        let request =
            ApiRequest::get(format!("{INTENT_API_ROOT}/interface/network-device/{device_id}"));
        let payload = self.client.execute(request).await?;
        response_list(&payload)
    }

    /// Query client telemetry over a time window. Returns the full body:
    /// the list endpoint carries paging metadata alongside the records.
    pub async fn clients(
        &self,
        range: TimeRange,
        filters: &ClientFilters,
        paging: &Paging,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest::get(format!("{DATA_API_ROOT}/clients"))
            .with_caller_id()
            .with_query(time_params(range))
            .with_query(filters.to_query());

        if let Some(limit) = paging.limit {
            request = request.with_param("limit", limit.to_string());
        }
        if let Some(offset) = paging.offset {
            request = request.with_param("offset", offset.to_string());
        }
        if let Some(sort_by) = &paging.sort_by {
            request = request.with_param("sortBy", sort_by.clone());
        }
        if let Some(order) = &paging.order {
            request = request.with_param("order", order.clone());
        }

        self.client.execute(request).await
    }

    /// Fetch one client by MAC address.
    pub async fn client_by_mac(
        &self,
        mac: &str,
        range: TimeRange,
        view: Option<&str>,
        attribute: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest::get(format!("{DATA_API_ROOT}/clients/{mac}"))
            .with_caller_id()
            .with_query(time_params(range));

        if let Some(view) = view {
            request = request.with_param("view", view);
        }
        if let Some(attribute) = attribute {
            request = request.with_param("attribute", attribute);
        }

        self.client.execute(request).await.map_err(|err| match err {
            ApiError::NotFound(_) => ApiError::NotFound(format!(
                "client {mac} was not found in the requested time window"
            )),
            other => other,
        })
    }

    /// Count clients matching the filters over a time window.
    pub async fn count_clients(
        &self,
        range: TimeRange,
        filters: &ClientFilters,
    ) -> Result<CountResult, ApiError> {
        let request = ApiRequest::get(format!("{DATA_API_ROOT}/clients/count"))
            .with_caller_id()
            .with_query(time_params(range))
            .with_query(filters.to_query());

        let payload = self.client.execute(request).await?;
        let count = CountResult::from_payload(&payload).ok_or_else(|| {
            ApiError::Validation(format!(
                "count response had an unexpected shape: {payload}"
            ))
        })?;

        debug!(total = count.total, "client count retrieved");
        Ok(count)
    }
}

fn time_params(range: TimeRange) -> Vec<(String, String)> {
    vec![
        ("startTime".to_string(), range.start_epoch_ms.to_string()),
        ("endTime".to_string(), range.end_epoch_ms.to_string()),
    ]
}

/// Unwrap the `{"response": [...]}` envelope the intent API uses.
fn response_list(payload: &Value) -> Result<Vec<Value>, ApiError> {
    payload
        .get("response")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| {
            ApiError::Validation(
                "expected a response envelope containing an array of records".to_string(),
            )
        })
}
