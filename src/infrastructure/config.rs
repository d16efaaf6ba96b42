use crate::domain::error::MenuError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_menu_url")]
    pub menu_url: String,
    #[serde(default = "default_nutrition_url")]
    pub nutrition_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub serve_stale_on_error: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            menu_url: default_menu_url(),
            nutrition_url: default_nutrition_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            serve_stale_on_error: false,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            http_proxy: None,
            logging: Logging::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

// Defaults
fn default_theme() -> String {
    "temp".to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_menu_url() -> String {
    "https://dining.berkeley.edu/menus/".to_string()
}
fn default_nutrition_url() -> String {
    "https://dining.berkeley.edu/wp-admin/admin-ajax.php".to_string()
}
fn default_user_agent() -> String {
    // The AJAX endpoint refuses obviously non-browser agents
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_ttl_secs() -> u64 {
    60 * 60
}
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dining-menu").join("config.toml"))
}

/// Load config from the default location, falling back to defaults
pub fn load_config() -> Result<Config, MenuError> {
    if let Some(path) = get_config_path() {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

/// Load config from an explicit path; a missing or broken file is an error
pub fn load_config_from(path: &Path) -> Result<Config, MenuError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str::<Config>(&content)?)
}

pub fn generate_config_sample(path: Option<&Path>) -> Result<PathBuf, MenuError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()
            .ok_or_else(|| MenuError::Config("Cannot determine config directory".to_string()))?,
    };

    if path.exists() {
        return Err(MenuError::Config(format!(
            "Config file already exists at: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let toml_content = toml::to_string_pretty(&Config::default())
        .map_err(|e| MenuError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(&path, toml_content)
        .map_err(|e| MenuError::Config(format!("Failed to write config file: {}", e)))?;

    Ok(path)
}
