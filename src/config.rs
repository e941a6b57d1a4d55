use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the matrix document is stored; empty means the config directory
    #[serde(default)]
    pub data_file: String,
    /// Event polling interval in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: String::new(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".dsm-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, path = %config_path.display(), "ignoring invalid config");
                None
            }
        }
    }

    /// Load the config, writing the defaults on first run
    pub fn load_or_init() -> Config {
        if let Some(config) = Self::load() {
            return config;
        }

        let config = Config::default();
        if Self::config_path().is_some_and(|p| !p.exists()) {
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "could not write default config");
            }
        }
        config
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Directory holding the matrix document when `data_file` is unset
    pub fn data_dir(&self) -> PathBuf {
        Self::config_dir().unwrap_or_else(|| env::temp_dir().join("dsm-tui"))
    }

    /// Explicit data file path, if configured
    pub fn data_path(&self) -> Option<PathBuf> {
        if self.data_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.data_file))
        }
    }
}
