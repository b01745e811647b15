/// CLI configuration
use lumen_client::{ClientConfig, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "lumen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Backend base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `file` must exist; otherwise `lumen.toml` is read if
    /// present. `LUMEN_`-prefixed variables (`LUMEN_API_URL`,
    /// `LUMEN_API_TIMEOUT`) override the file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("LUMEN")
                .separator("_")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "API URL is required (set LUMEN_API_URL)".to_string(),
            ));
        }

        if self.api.timeout == Some(0) {
            return Err(ConfigError::Invalid(
                "API timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    /// Client settings for the documents backend.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api.url.clone());
        match self.api.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_url(),
        timeout: None,
    }
}

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { api: default_api() }
    }
}
