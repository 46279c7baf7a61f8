use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const BASE_URL_ENV: &str = "API_BASE_URL";
const DEFAULT_DATA_DIR: &str = "data";
const SESSION_DB_FILE: &str = "client.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API base URL configured; set API_BASE_URL or `api_base_url` in the config file")]
    MissingBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_DB_FILE)
    }

    /// Pick the base URL: command line, then environment, then config file.
    pub fn resolve_base_url(
        &self,
        cli_value: Option<&str>,
        env_value: Option<&str>,
    ) -> Result<String, ConfigError> {
        [cli_value, env_value, self.api_base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(ConfigError::MissingBaseUrl)
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}
