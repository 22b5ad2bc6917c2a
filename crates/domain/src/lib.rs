//! # CatC Domain
//!
//! Business domain types and models for the Catalyst Center client.
//!
//! This crate contains:
//! - Domain data types (TimeRange, ClientFilters, ListOutcome, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and the time-window resolver
//!
//! ## Architecture
//! - No dependencies on other CatC crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export time-window resolution utilities
pub use utils::time_window::{resolve_window, resolve_window_at};
