//! Configuration settings for vidbridge.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "TWELVE_LABS_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub models: ModelSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (off, error, warn, info, debug, trace).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Versioned REST root of the video API.
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.twelvelabs.io/v1.3".to_string(),
        }
    }
}

/// One model entry sent when creating an index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexModel {
    pub model_name: String,
    #[serde(default)]
    pub model_options: Vec<String>,
}

impl IndexModel {
    fn new(name: &str, options: &[&str]) -> Self {
        Self {
            model_name: name.to_string(),
            model_options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Model pairing used for new indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Embedding model first, generative model second.
    pub index_models: Vec<IndexModel>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            index_models: vec![
                IndexModel::new("marengo2.7", &["visual", "audio"]),
                IndexModel::new("pegasus1.2", &["visual", "audio"]),
            ],
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Render settings as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidbridge")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Read the API key from the environment.
    ///
    /// An unset or blank variable is an error; callers treat it as fatal.
    pub fn api_key() -> Result<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(BridgeError::MissingCredential(API_KEY_ENV.to_string())),
        }
    }
}
