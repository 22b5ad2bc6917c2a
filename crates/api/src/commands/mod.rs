//! Callable operations - thin passthroughs over the core client layer

mod clients;
mod devices;
mod interfaces;
mod sites;

pub use clients::*;
pub use devices::*;
pub use interfaces::*;
pub use sites::*;

use catc_domain::{CatcError, Result, TimeRange};
use serde_json::{json, Value};

/// Serialize an operation response as pretty JSON.
pub(crate) fn to_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CatcError::Internal(format!("failed to serialize response: {e}")))
}

/// Echo the resolved window so callers can see what was actually queried,
/// including whether the start was moved to the retention floor.
pub(crate) fn window_json(range: TimeRange) -> Value {
    json!({
        "startTime": range.start_epoch_ms,
        "endTime": range.end_epoch_ms,
        "adjustedForFloor": range.adjusted_for_floor,
    })
}
