//! # CatC Infrastructure
//!
//! Infrastructure layer for the Catalyst Center client.
//!
//! This crate contains:
//! - HTTP transport (reqwest wrapper with timeout and TLS configuration)
//! - The resilient API client layer (session, executor, bounded fetch)
//! - Configuration loading (environment-first with file fallback)
//!
//! ## Architecture
//! - Depends on `catc-domain` for types and errors
//! - Contains all "impure" code (network I/O, environment access)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use http::*;
