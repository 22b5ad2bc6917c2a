//! Device interface operations

use catc_domain::Result;
use serde_json::json;
use tracing::info;

use super::to_pretty;
use crate::context::AppContext;

/// List the interfaces of one network device.
pub async fn get_device_interfaces(ctx: &AppContext, device_id: &str) -> Result<String> {
    info!(command = "interfaces::get_device_interfaces", device_id, "Listing interfaces");

    let interfaces = ctx.commands.device_interfaces(device_id).await?;
    to_pretty(&json!(interfaces))
}
