//! Bounded list retrieval
//!
//! Client queries can match far more records than one response should
//! carry. The guard asks the count endpoint first and only issues the list
//! request when the total fits under the cap; a zero count or an
//! over-the-cap count never triggers a fetch.

use std::sync::Arc;

use catc_domain::constants::{MAX_PAGE_SIZE, RESULT_CAP};
use catc_domain::types::{ClientFilters, ListOutcome, Paging, TimeRange};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::commands::ApiCommands;
use super::errors::ApiError;

/// Configuration for bounded fetches
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Largest total the guard will fetch; anything above returns guidance
    pub cap: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { cap: RESULT_CAP }
    }
}

/// Count-then-fetch guard for client list queries
pub struct ResultSizeGuard {
    commands: Arc<ApiCommands>,
    config: GuardConfig,
}

impl ResultSizeGuard {
    pub fn new(commands: Arc<ApiCommands>, config: GuardConfig) -> Self {
        Self { commands, config }
    }

    /// Fetch a bounded client list.
    ///
    /// The count call completes and is interpreted before any list call is
    /// issued; the two awaits are deliberately sequential.
    #[instrument(skip(self, filters, paging))]
    pub async fn fetch_bounded(
        &self,
        range: TimeRange,
        filters: &ClientFilters,
        paging: &Paging,
    ) -> Result<ListOutcome, ApiError> {
        let count = self.commands.count_clients(range, filters).await?;

        if count.total == 0 {
            debug!("count is zero; skipping the list fetch");
            return Ok(ListOutcome::Empty);
        }

        if count.total > self.config.cap {
            info!(
                total = count.total,
                cap = self.config.cap,
                "count exceeds cap; returning guidance without fetching"
            );
            return Ok(ListOutcome::TooMany { total: count.total });
        }

        let requested = paging.limit.unwrap_or(self.config.cap);
        let effective = requested.min(MAX_PAGE_SIZE).min(count.total).max(1);

        let paging = Paging { limit: Some(effective), ..paging.clone() };
        let body = self.commands.clients(range, filters, &paging).await?;
        let items = body
            .get("response")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                ApiError::Validation(
                    "client list response did not contain a response array".to_string(),
                )
            })?;

        Ok(ListOutcome::Items { total: count.total, items })
    }
}
