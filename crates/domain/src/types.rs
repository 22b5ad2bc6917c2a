//! Common data types used throughout the application

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved query time window in epoch milliseconds
///
/// Invariants: `start_epoch_ms <= end_epoch_ms`, and `start_epoch_ms` is
/// never earlier than the 30-day retention floor at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    /// True when the requested start predated the retention floor and was
    /// moved forward to it.
    pub adjusted_for_floor: bool,
}

/// Filters applied to client-telemetry queries
///
/// Named fields cover the documented filter keys; `extra` is a free-form
/// escape hatch for keys added to the API after this client was written.
/// The remote API validates key names; this type only carries them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFilters {
    pub band: Option<String>,
    pub connected_network_device_name: Option<String>,
    pub connection_status: Option<String>,
    pub device_type: Option<String>,
    pub ipv4_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub mac_address: Option<String>,
    pub os_type: Option<String>,
    pub site_hierarchy: Option<String>,
    pub site_id: Option<String>,
    pub ssid: Option<String>,
    pub vlan: Option<String>,
    pub wlc_name: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl ClientFilters {
    /// Serialize to query parameters in a stable order: named keys first
    /// (alphabetical), then `extra` in its map order. Deterministic output
    /// keeps requests reproducible.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let named: [(&str, &Option<String>); 13] = [
            ("band", &self.band),
            ("connectedNetworkDeviceName", &self.connected_network_device_name),
            ("connectionStatus", &self.connection_status),
            ("ipv4Address", &self.ipv4_address),
            ("ipv6Address", &self.ipv6_address),
            ("macAddress", &self.mac_address),
            ("osType", &self.os_type),
            ("siteHierarchy", &self.site_hierarchy),
            ("siteId", &self.site_id),
            ("ssid", &self.ssid),
            ("type", &self.device_type),
            ("vlan", &self.vlan),
            ("wlcName", &self.wlc_name),
        ];

        let mut params: Vec<(String, String)> = named
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|v| ((*key).to_string(), v.clone()))
            })
            .collect();

        for (key, value) in &self.extra {
            params.push((key.clone(), value.clone()));
        }

        params
    }
}

/// Sorting and paging controls for list queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paging {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Result of a count query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub total: i64,
}

impl CountResult {
    /// Extract a count from a response payload.
    ///
    /// The API returns the count either as a bare integer under `response`
    /// or nested as `{"count": N}`; both shapes are accepted. Any other
    /// shape yields `None` — callers treat that as a validation failure
    /// rather than guessing.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let inner = payload.get("response").unwrap_or(payload);

        let total = match inner {
            Value::Number(_) => inner.as_i64(),
            Value::Object(_) => inner.get("count").and_then(Value::as_i64),
            _ => None,
        }?;

        Some(Self { total })
    }
}

/// Outcome of a bounded list fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ListOutcome {
    /// The count exceeded the cap; no items were fetched. Callers must
    /// refine filters rather than fall back to fetching anyway.
    TooMany { total: i64 },
    /// The count was zero; no list request was issued.
    Empty,
    /// Items fetched within the cap.
    Items { total: i64, items: Vec<Value> },
}
