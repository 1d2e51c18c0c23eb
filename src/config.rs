use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::account::{ChainId, ItemLayout};
use crate::controller::DisplaySettings;
use crate::error::{AccountsError, Result};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AccountsConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub layout: ItemLayout,
    #[serde(default)]
    pub ens: EnsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// Show balances for every account, not only the selected one
    #[serde(default = "default_multi_account_balances")]
    pub multi_account_balances: bool,
}

fn default_multi_account_balances() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            multi_account_balances: default_multi_account_balances(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// JSON-RPC endpoint per chain id
    #[serde(default = "default_endpoints")]
    pub endpoints: HashMap<ChainId, String>,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoints() -> HashMap<ChainId, String> {
    let mut endpoints = HashMap::new();
    endpoints.insert(ChainId::MAINNET, "https://cloudflare-eth.com".to_string());
    endpoints
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            endpoints: default_endpoints(),
        }
    }
}

impl EnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AccountsConfig {
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            multi_account_balances: self.display.multi_account_balances,
            layout: self.layout,
        }
    }

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|e| AccountsError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Load `path`, falling back to defaults when it cannot be read or
    /// parsed. A missing file is created with the defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path = Path::new(path);
        if !path.exists() {
            info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            if let Err(e) = config.save(path) {
                warn!("Could not write default config: {}", e);
            }
            return config;
        }

        match Self::load(path) {
            Ok(config) => {
                info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
