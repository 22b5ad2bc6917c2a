//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CATC_HOST`: Catalyst Center base URL
//! - `CATC_USERNAME`: Username for the token exchange
//! - `CATC_PASSWORD`: Password for the token exchange
//! - `CATC_CALLER_ID`: Value for the `X-CALLER-ID` audit header
//! - `CATC_TIMEOUT_SECS`: Transport timeout in seconds
//! - `CATC_ACCEPT_INVALID_CERTS`: Disable TLS validation (true/false)
//!
//! ## File Locations
//! The loader probes `config.toml`/`config.json` and `catc.toml`/`catc.json`
//! in the working directory, its parents, and next to the executable.

use std::path::{Path, PathBuf};

use catc_domain::{CatcConfig, CatcError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CatcError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<CatcConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The connection variables (`CATC_HOST`, `CATC_USERNAME`, `CATC_PASSWORD`)
/// are required; the rest fall back to their defaults.
///
/// # Errors
/// Returns `CatcError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<CatcConfig> {
    let host = env_var("CATC_HOST")?;
    let username = env_var("CATC_USERNAME")?;
    let password = env_var("CATC_PASSWORD")?;

    let caller_id = std::env::var("CATC_CALLER_ID").unwrap_or_else(|_| "catc".to_string());
    let timeout_secs = match std::env::var("CATC_TIMEOUT_SECS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| CatcError::Config(format!("Invalid timeout: {}", e)))?,
        Err(_) => 30,
    };
    let accept_invalid_certs = env_bool("CATC_ACCEPT_INVALID_CERTS", false);

    validate(CatcConfig { host, username, password, caller_id, timeout_secs, accept_invalid_certs })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CatcError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<CatcConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CatcError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CatcError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CatcError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<CatcConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: CatcConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CatcError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| CatcError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => return Err(CatcError::Config(format!("Unsupported config format: {}", extension))),
    };

    validate(config)
}

/// Reject configurations whose host is not a parseable URL before any
/// request construction gets to choke on it.
fn validate(config: CatcConfig) -> Result<CatcConfig> {
    url::Url::parse(&config.host)
        .map_err(|_| CatcError::Config(format!("Invalid host URL: {}", config.host)))?;
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, up to two parent levels, and the
/// executable's directory, in that order.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for base in [&cwd, &cwd.join(".."), &cwd.join("../..")] {
            candidates.push(base.join("config.toml"));
            candidates.push(base.join("config.json"));
            candidates.push(base.join("catc.toml"));
            candidates.push(base.join("catc.json"));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
            candidates.push(exe_dir.join("config.json"));
            candidates.push(exe_dir.join("catc.toml"));
            candidates.push(exe_dir.join("catc.json"));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| CatcError::Config(format!("Missing environment variable: {}", name)))
}

/// Get boolean environment variable with a default
fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
