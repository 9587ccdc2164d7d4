//! Wallet configuration loaded from TOML.

use meridian_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::derivation::DerivationPath;
use crate::error::WalletError;

/// Top-level wallet configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Chain id mixed into every sign-bytes pre-image.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Default `tracing` filter; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub hardware: HardwareConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// Upper bound on any single driver call, including user confirmation.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub derivation_path: DerivationPath,
}

fn default_chain_id() -> String {
    "privatenet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl WalletConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Install the global `tracing` subscriber described by this config.
    pub fn init_logging(&self) {
        meridian_utils::init_tracing(self.log_format, &self.log_level);
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            hardware: HardwareConfig::default(),
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            derivation_path: DerivationPath::default(),
        }
    }
}
