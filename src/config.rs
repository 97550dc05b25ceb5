use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api.ifalabs.com/api";

const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10_000;
const DEFAULT_PRICE_TTL_MS: u64 = 5_000;
const DEFAULT_ALL_PRICES_TTL_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Polling interval used by the watch view.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// TTL of a single cached quote.
    #[serde(default = "default_price_ttl_ms")]
    pub price_ttl_ms: u64,
    /// TTL of the cached aggregate price list. Must be >= `price_ttl_ms`,
    /// otherwise the aggregate would be "fresher" than its inputs.
    #[serde(default = "default_all_prices_ttl_ms")]
    pub all_prices_ttl_ms: u64,
    /// Per-request network timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

fn default_price_ttl_ms() -> u64 {
    DEFAULT_PRICE_TTL_MS
}

fn default_all_prices_ttl_ms() -> u64 {
    DEFAULT_ALL_PRICES_TTL_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: ApiConfig::default(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            price_ttl_ms: DEFAULT_PRICE_TTL_MS,
            all_prices_ttl_ms: DEFAULT_ALL_PRICES_TTL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "ifalabs", "oraclefeed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.all_prices_ttl_ms < self.price_ttl_ms {
            anyhow::bail!(
                "all_prices_ttl_ms ({}) must be >= price_ttl_ms ({})",
                self.all_prices_ttl_ms,
                self.price_ttl_ms
            );
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn price_ttl(&self) -> Duration {
        Duration::from_millis(self.price_ttl_ms)
    }

    pub fn all_prices_ttl(&self) -> Duration {
        Duration::from_millis(self.all_prices_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
