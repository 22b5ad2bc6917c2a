//! Client telemetry operations

use catc_domain::constants::RESULT_CAP;
use catc_domain::types::{ClientFilters, ListOutcome, Paging};
use catc_domain::{resolve_window, Result};
use serde_json::json;
use tracing::info;

use super::{to_pretty, window_json};
use crate::context::AppContext;

/// Arguments for a client-telemetry query
#[derive(Debug, Clone, Default)]
pub struct ClientQuery {
    /// Relative time expression ("last 2 hours", "today", ...); wins over
    /// the absolute bounds when present
    pub relative: Option<String>,
    /// Absolute ISO start; end defaults to now
    pub start: Option<String>,
    pub end: Option<String>,
    pub filters: ClientFilters,
    pub paging: Paging,
}

impl ClientQuery {
    fn resolve(&self) -> Result<catc_domain::TimeRange> {
        resolve_window(self.relative.as_deref(), self.start.as_deref(), self.end.as_deref())
    }
}

/// Query client telemetry over a time window, bounded by the result cap.
pub async fn get_clients(ctx: &AppContext, query: ClientQuery) -> Result<String> {
    info!(command = "clients::get_clients", "Querying client telemetry");

    let range = query.resolve()?;
    let outcome = ctx.guard.fetch_bounded(range, &query.filters, &query.paging).await?;

    let response = match outcome {
        ListOutcome::Empty => json!({
            "total": 0,
            "items": [],
            "timeWindow": window_json(range),
        }),
        ListOutcome::TooMany { total } => json!({
            "total": total,
            "items": [],
            "guidance": format!(
                "query matches {total} clients, more than the {RESULT_CAP} returned in one \
                 call; narrow the filters or the time window"
            ),
            "timeWindow": window_json(range),
        }),
        ListOutcome::Items { total, items } => json!({
            "total": total,
            "items": items,
            "timeWindow": window_json(range),
        }),
    };

    to_pretty(&response)
}

/// Count clients matching the filters over a time window.
pub async fn get_client_count(ctx: &AppContext, query: ClientQuery) -> Result<String> {
    info!(command = "clients::get_client_count", "Counting clients");

    let range = query.resolve()?;
    let count = ctx.commands.count_clients(range, &query.filters).await?;

    to_pretty(&json!({
        "total": count.total,
        "timeWindow": window_json(range),
    }))
}

/// Fetch one client by MAC address.
pub async fn get_client_by_mac(
    ctx: &AppContext,
    mac: &str,
    query: ClientQuery,
    view: Option<&str>,
    attribute: Option<&str>,
) -> Result<String> {
    info!(command = "clients::get_client_by_mac", mac, "Fetching client");

    let range = query.resolve()?;
    let client = ctx.commands.client_by_mac(mac, range, view, attribute).await?;
    to_pretty(&client)
}
