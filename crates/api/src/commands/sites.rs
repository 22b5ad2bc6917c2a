//! Site inventory operations

use catc_domain::Result;
use serde_json::{json, Value};
use tracing::info;

use super::to_pretty;
use crate::context::AppContext;

/// List sites with their location attributes lifted to the top level.
pub async fn get_sites(ctx: &AppContext) -> Result<String> {
    info!(command = "sites::get_sites", "Listing sites");

    let sites = ctx.commands.sites().await?;
    let flattened: Vec<Value> = sites.iter().map(flatten_site).collect();
    to_pretty(&json!(flattened))
}

/// Lift the attributes of the `Location` entry in `additionalInfo` to the
/// top level of the site record. Existing top-level keys win on collision.
fn flatten_site(site: &Value) -> Value {
    let Some(fields) = site.as_object() else {
        return site.clone();
    };

    let mut flat = fields.clone();
    let Some(info) = flat.remove("additionalInfo") else {
        return Value::Object(flat);
    };

    if let Some(entries) = info.as_array() {
        for entry in entries {
            if entry.get("nameSpace").and_then(Value::as_str) != Some("Location") {
                continue;
            }
            if let Some(attributes) = entry.get("attributes").and_then(Value::as_object) {
                for (key, value) in attributes {
                    flat.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
    }

    Value::Object(flat)
}
