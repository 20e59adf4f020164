use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global pd-maintenance configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub windows: WindowsConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the PagerDuty REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowsConfig {
    /// Description that marks a window as managed by this tool
    #[serde(default = "default_description")]
    pub description: String,
    /// Status filter passed to the list endpoint
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_base_url() -> String {
    "https://api.pagerduty.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_description() -> String {
    "Automatic Maintenance".to_string()
}

fn default_filter() -> String {
    "ongoing".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            description: default_description(),
            filter: default_filter(),
        }
    }
}

/// Returns the config directory (~/.config/pd-maintenance/)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("pd-maintenance");
    Ok(config_dir)
}

/// Returns the default config file path (~/.config/pd-maintenance/config.toml)
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from `path`, or from the default location.
///
/// A missing default file yields the defaults; a missing explicit path is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {:?}", p);
            }
            p.to_path_buf()
        }
        None => match config_file() {
            Ok(p) => p,
            Err(_) => return Ok(Config::default()),
        },
    };

    if config_path.exists() {
        parse_config_file(&config_path)
    } else {
        Ok(Config::default())
    }
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    Ok(config)
}
