//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::TtlPolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream catalog API
    pub api_base_url: String,
    /// Bearer token sent to the upstream API, if any
    pub api_token: Option<String>,
    /// Upstream request timeout in seconds
    pub api_timeout: u64,
    /// Fallback TTL in seconds for entries stored without one
    pub default_ttl: u64,
    /// TTL in seconds for list and search pages
    pub list_ttl: u64,
    /// TTL in seconds for single-item details
    pub detail_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_BASE_URL` - Upstream API base URL (default: http://localhost:8080/api)
    /// - `API_TOKEN` - Upstream bearer token (default: unset)
    /// - `API_TIMEOUT_SECS` - Upstream timeout (default: 10)
    /// - `DEFAULT_TTL_SECS` - Fallback TTL (default: 300)
    /// - `LIST_TTL_SECS` - List/search TTL (default: 300)
    /// - `DETAIL_TTL_SECS` - Detail TTL (default: 900)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|v| !v.is_empty()),
            api_timeout: parse_var("API_TIMEOUT_SECS").unwrap_or(defaults.api_timeout),
            default_ttl: parse_var("DEFAULT_TTL_SECS").unwrap_or(defaults.default_ttl),
            list_ttl: parse_var("LIST_TTL_SECS").unwrap_or(defaults.list_ttl),
            detail_ttl: parse_var("DETAIL_TTL_SECS").unwrap_or(defaults.detail_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL_SECS").unwrap_or(defaults.sweep_interval),
        }
    }

    /// TTLs the repositories apply per resource class.
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            list: Duration::from_secs(self.list_ttl),
            detail: Duration::from_secs(self.detail_ttl),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: None,
            api_timeout: 10,
            default_ttl: 300,
            list_ttl: 300,
            detail_ttl: 900,
            sweep_interval: 60,
        }
    }
}

// Zero TTLs and intervals are treated as unset.
fn parse_var<T: FromStr + PartialEq + Default>(name: &str) -> Option<T> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v != T::default())
}
