//! Catalyst Center API client layer
//!
//! The resilient core beneath the callable operations:
//!
//! - [`auth`] — session manager caching the `X-Auth-Token` credential with
//!   a single-flight exchange guarantee
//! - [`client`] — request executor applying one targeted retry per failure
//!   class (expired session, data-not-ready)
//! - [`commands`] — typed surface with one method per consumed endpoint
//! - [`guard`] — count-then-fetch bounding for list queries
//! - [`errors`] — failure-mode classification for the layer

pub mod auth;
pub mod client;
pub mod commands;
pub mod errors;
pub mod guard;

pub use auth::{AccessTokenProvider, TokenSession};
pub use client::{ApiRequest, CatalystClient, CatalystClientConfig};
pub use commands::ApiCommands;
pub use errors::{ApiError, ApiErrorCategory};
pub use guard::{GuardConfig, ResultSizeGuard};
