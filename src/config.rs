use crate::error::{env_error, CalResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use toml;

/// Default polling period of the lifecycle notifier, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default directory for saved day schedules
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Which backend meetings are stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Main configuration structure for the calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend meetings are stored in
    pub storage_backend: StorageBackend,
    /// Redis connection URL, used when the backend is `redis`
    pub redis_url: String,
    /// Polling period of the lifecycle notifier, in milliseconds
    pub poll_interval_ms: u64,
    /// Directory day schedules are saved into
    pub output_dir: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> CalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw
                .parse::<StorageBackend>()
                .map_err(|_| env_error("STORAGE_BACKEND"))?,
            Err(_) => StorageBackend::default(),
        };

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| String::from(DEFAULT_REDIS_URL));

        let poll_interval_ms = match env::var("POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| env_error("POLL_INTERVAL_MS"))?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };
        if poll_interval_ms == 0 {
            // A zero period would make the notifier spin
            return Err(env_error("POLL_INTERVAL_MS"));
        }

        let output_dir =
            env::var("OUTPUT_DIR").unwrap_or_else(|_| String::from(DEFAULT_OUTPUT_DIR));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("schedule".to_string(), true);
        components.insert("notifier".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            storage_backend,
            redis_url,
            poll_interval_ms,
            output_dir,
            components,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> CalResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    fn save_components(&self) -> CalResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("Redis".parse::<StorageBackend>(), Ok(StorageBackend::Redis));
        assert_eq!(" REDIS ".parse::<StorageBackend>(), Ok(StorageBackend::Redis));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn unknown_components_default_to_disabled() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            redis_url: String::from(DEFAULT_REDIS_URL),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            output_dir: String::from(DEFAULT_OUTPUT_DIR),
            components: HashMap::from([(String::from("schedule"), true)]),
        };
        assert!(config.is_component_enabled("schedule"));
        assert!(!config.is_component_enabled("notifier"));
    }
}
