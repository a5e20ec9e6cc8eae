//! Configuration loading and management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the vault server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for staged temporary files
    #[serde(default = "default_temp_path")]
    pub temp_path: PathBuf,

    /// Directory holding the credential stores
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Root directory of the content store
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,
}

fn default_temp_path() -> PathBuf {
    PathBuf::from("/tmp/")
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data/")
}

fn default_root_path() -> PathBuf {
    PathBuf::from("./vault/")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_path: default_temp_path(),
            data_path: default_data_path(),
            root_path: default_root_path(),
        }
    }
}

impl Config {
    /// Load configuration from the config directory
    pub fn load(config_path: &str) -> Result<Self> {
        let config_file = Path::new(config_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_file);
            let config = Config::default();

            // Create config directory if it doesn't exist
            std::fs::create_dir_all(config_path)
                .with_context(|| format!("Failed to create config directory: {}", config_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }
}
