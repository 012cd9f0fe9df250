use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "profiles.toml";
pub const DATA_ROOT_ENV: &str = "PROFILE_DATA_ROOT";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Minutes a cached profile survives without being read.
    #[serde(default = "default_cache_expiry_minutes")]
    pub cache_expiry_minutes: u64,
    /// Upper bound on cached profiles; 0 disables the cache.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            cache_expiry_minutes: default_cache_expiry_minutes(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

/// One year; longer idle windows are rejected by validation.
pub const MAX_CACHE_EXPIRY_MINUTES: u64 = 365 * 24 * 60;

fn default_data_root() -> String {
    "data/players".into()
}

fn default_cache_expiry_minutes() -> u64 {
    10
}

fn default_cache_max_entries() -> u64 {
    1000
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()
    }
}

impl StorageConfig {
    /// `PROFILE_DATA_ROOT` wins over the file value when set and non-blank.
    pub fn normalize_from_env(&mut self) {
        if let Ok(root) = std::env::var(DATA_ROOT_ENV) {
            if !root.trim().is_empty() {
                self.data_root = root;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_root.trim().is_empty() {
            return Err(anyhow!(
                "storage.data_root is empty; set it in the config file or via {DATA_ROOT_ENV}"
            ));
        }
        if self.cache_expiry_minutes == 0 || self.cache_expiry_minutes > MAX_CACHE_EXPIRY_MINUTES {
            return Err(anyhow!(
                "storage.cache_expiry_minutes must be in 1..={MAX_CACHE_EXPIRY_MINUTES}"
            ));
        }
        Ok(())
    }

    /// Idle window, clamped to the accepted maximum.
    pub fn cache_time_to_idle(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_minutes.min(MAX_CACHE_EXPIRY_MINUTES) * 60)
    }
}
