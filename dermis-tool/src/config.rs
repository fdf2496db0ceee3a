use std::path::PathBuf;
use std::time::Duration;

use dermis_oracle::DEFAULT_MODEL;
use serde::Deserialize;
use tracing::warn;

use crate::error::DermError;
use crate::store::{StoreType, default_store_path};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub openrouter_api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Upper bound on a single oracle call; unbounded when absent.
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub timeline: TimelineConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct TimelineConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dermis").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<Config, DermError> {
    Ok(toml::from_str(content)?)
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };

    match parse_config(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed config");
            Config::default()
        }
    }
}

impl Config {
    pub fn api_key(&self) -> Result<String, DermError> {
        // First, try environment variable
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        // Then, the config file
        match &self.openrouter_api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => Err(DermError::ApiKeyNotFound),
        }
    }

    pub fn model(&self, cli_model: Option<String>) -> String {
        cli_model
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn store(
        &self,
        cli_type: Option<StoreType>,
        cli_path: Option<PathBuf>,
    ) -> (StoreType, PathBuf) {
        let store_type = cli_type.unwrap_or(self.timeline.r#type);
        let store_path = cli_path
            .or_else(|| self.timeline.path.clone())
            .unwrap_or_else(|| default_store_path(store_type));

        (store_type, store_path)
    }
}
