//! Network device inventory operations

use std::collections::BTreeMap;

use catc_domain::Result;
use serde_json::json;
use tracing::info;

use super::to_pretty;
use crate::context::AppContext;

/// List network devices known to the inventory.
///
/// The filter map is applied verbatim as request parameters; the remote
/// API is authoritative about which keys it accepts.
pub async fn get_network_devices(
    ctx: &AppContext,
    filters: BTreeMap<String, String>,
) -> Result<String> {
    info!(command = "devices::get_network_devices", filters = filters.len(), "Listing devices");

    let devices = ctx.commands.network_devices(&filters).await?;
    to_pretty(&json!(devices))
}
