//! # Controller Configuration
//!
//! Operator-level settings loaded from environment variables.

use std::time::Duration;

use crate::constants::{
    DEFAULT_AGENT_IMAGE, DEFAULT_CONFIG_MAP_ENTRY, DEFAULT_METRICS_PORT,
    DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS, PROXY_ENV_NAMES,
};

/// Operator-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// The values are read once at start-up; the manifest builder only ever sees this
/// snapshot, never the live process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Agent image used when a resource does not set `spec.image`
    pub agent_image: String,
    /// Key of the agent configuration inside the generated ConfigMap
    pub config_map_entry: String,
    /// Reconciliation error requeue interval (seconds)
    pub reconciliation_error_requeue_secs: u64,
    /// Maximum concurrent reconciliations
    /// Limits how many resources can be reconciled simultaneously
    pub max_concurrent_reconciliations: u16,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Proxy settings injected into every agent container, in `PROXY_ENV_NAMES` order
    pub proxy_env: Vec<(String, String)>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            agent_image: DEFAULT_AGENT_IMAGE.to_string(),
            config_map_entry: DEFAULT_CONFIG_MAP_ENTRY.to_string(),
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            max_concurrent_reconciliations: 10,
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            proxy_env: Vec::new(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            agent_image: env_var_or_default_str("AGENT_IMAGE", DEFAULT_AGENT_IMAGE),
            config_map_entry: env_var_or_default_str("CONFIG_MAP_ENTRY", DEFAULT_CONFIG_MAP_ENTRY),
            reconciliation_error_requeue_secs: env_var_or_default(
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            ),
            max_concurrent_reconciliations: env_var_or_default(
                "MAX_CONCURRENT_RECONCILIATIONS",
                10,
            ),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "json"),
            proxy_env: read_proxy_env(),
        }
    }

    /// Get reconciliation error requeue duration
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port serving `/metrics`, `/healthz` and `/readyz`
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            metrics_port: env_var_or_default("METRICS_PORT", DEFAULT_METRICS_PORT),
        }
    }
}

/// Snapshot the proxy variables that are set in the operator's environment
fn read_proxy_env() -> Vec<(String, String)> {
    PROXY_ENV_NAMES
        .iter()
        .filter_map(|name| std::env::var(name).ok().map(|v| ((*name).to_string(), v)))
        .collect()
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
