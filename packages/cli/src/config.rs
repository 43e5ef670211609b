use anyhow::{bail, Context};
use pagecraft_blocks::MapRegistry;
use pagecraft_editor::EditorConfig;
use pagecraft_resolver::{is_valid_date_format, DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the CMS API (menu endpoints live under it)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token sent with API requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// JSON file with block definitions, relative to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Undo history options
    #[serde(default)]
    pub history: EditorConfig,

    /// chrono format for date tags
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            if !is_valid_date_format(&config.date_format) {
                bail!("Invalid dateFormat {:?} in {}", config.date_format, config_path.display());
            }
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Block definitions, or an empty registry when none is configured
    pub fn load_registry(&self, cwd: &str) -> anyhow::Result<MapRegistry> {
        match &self.registry {
            Some(path) => {
                let path = PathBuf::from(cwd).join(path);
                MapRegistry::load(&path).with_context(|| format!("Cannot load registry {}", path.display()))
            }
            None => Ok(MapRegistry::new()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            registry: None,
            history: EditorConfig::default(),
            date_format: default_date_format(),
        }
    }
}
