//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Time-window constraints
pub const LOOKBACK_FLOOR_DAYS: i64 = 30;
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

// Result bounding
pub const RESULT_CAP: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 100;

// Catalyst Center application error codes (carried in 400 bodies)
pub const CODE_RANGE_TOO_OLD: i64 = 14013;
pub const CODE_DATA_NOT_READY: i64 = 14006;

// Request headers
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const CALLER_ID_HEADER: &str = "X-CALLER-ID";

// API path roots
pub const SYSTEM_API_ROOT: &str = "/dna/system/api/v1";
pub const INTENT_API_ROOT: &str = "/dna/intent/api/v1";
pub const DATA_API_ROOT: &str = "/dna/data/api/v1";
