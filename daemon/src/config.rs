//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(String),
}

/// Configuration for the registrar daemon.
///
/// Can be loaded from a TOML file via [`RegistrarConfig::from_toml_file`]
/// or built programmatically (e.g. for tests). CLI flags override file
/// values in `main`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Chain node RPC endpoint.
    #[serde(default = "default_chain_url")]
    pub chain_url: String,

    /// Name service (subsidized-tx builder) endpoint.
    #[serde(default = "default_namesvc_url")]
    pub namesvc_url: String,

    /// Data directory for the queue store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Encrypted keystore holding payment keys. Optional: without it the
    /// daemon serves only requests that carry their own payment key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<PathBuf>,

    /// Port of the control endpoint.
    #[serde(default = "default_control_port")]
    pub control_port: u16,

    /// TCP connect timeout for remote calls, seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for remote calls, seconds.
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,

    /// Minimum balance (base units) a payment address must hold.
    #[serde(default = "default_funding_threshold")]
    pub funding_threshold: u128,

    /// Maximum names a transfer recipient may already own.
    #[serde(default = "default_max_recipient_names")]
    pub max_recipient_names: usize,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_url() -> String {
    "http://127.0.0.1:7171".to_string()
}

fn default_namesvc_url() -> String {
    "http://127.0.0.1:7172".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./registrar_data")
}

fn default_control_port() -> u16 {
    7160
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_remote_timeout() -> u64 {
    30
}

fn default_funding_threshold() -> u128 {
    100_000
}

fn default_max_recipient_names() -> usize {
    25
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RegistrarConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("RegistrarConfig is always serializable to TOML")
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            chain_url: default_chain_url(),
            namesvc_url: default_namesvc_url(),
            data_dir: default_data_dir(),
            keystore_path: None,
            control_port: default_control_port(),
            connect_timeout_secs: default_connect_timeout(),
            remote_timeout_secs: default_remote_timeout(),
            funding_threshold: default_funding_threshold(),
            max_recipient_names: default_max_recipient_names(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
