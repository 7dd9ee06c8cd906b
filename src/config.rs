use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::memorization::schedule::DEFAULT_INTERVALS_DAYS;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ShlokaConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub verses: VersesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// `"sqlite"` or `"memory"`.
    pub backend: String,
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Review interval in days for each box; entry `n - 1` belongs to box `n`.
    pub intervals_days: Vec<u32>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VersesConfig {
    /// `"http"` or `"none"`.
    pub provider: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            // the shlok API conventionally owns 4000
            port: 4100,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_shloka_dir()
            .join("progress.db")
            .to_string_lossy()
            .into_owned();
        Self {
            backend: "sqlite".into(),
            db_path,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            intervals_days: DEFAULT_INTERVALS_DAYS.to_vec(),
        }
    }
}

impl Default for VersesConfig {
    fn default() -> Self {
        Self {
            provider: "http".into(),
            base_url: "http://localhost:4000/api/v1".into(),
            timeout_secs: 10,
        }
    }
}

/// Returns `~/.shloka/`, or `./.shloka/` when no home directory is known.
pub fn default_shloka_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shloka")
}

/// Returns the default config file path: `~/.shloka/config.toml`
pub fn default_config_path() -> PathBuf {
    default_shloka_dir().join("config.toml")
}

impl ShlokaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ShlokaConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (SHLOKA_DB, SHLOKA_LOG_LEVEL,
    /// SHLOKA_HOST, SHLOKA_PORT, SHLOKA_VERSE_API).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SHLOKA_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("SHLOKA_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("SHLOKA_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SHLOKA_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("SHLOKA_PORT is not a valid port: {val}"))?;
        }
        if let Ok(val) = std::env::var("SHLOKA_VERSE_API") {
            self.verses.base_url = val;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
