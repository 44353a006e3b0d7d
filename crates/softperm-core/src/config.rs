//! Configuration resolution for SoftPerm.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/softperm/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete SoftPerm configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Request history storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    /// History database file. When unset, the binary falls back to its
    /// default path.
    pub database_path: Option<PathBuf>,
}

/// Settings notice configuration.
///
/// The defaults stand in for the string resources a platform binding would
/// normally ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// Message shown when a permission is permanently denied and the request
    /// carries no override.
    pub fallback_message: String,
    /// Label of the action button that opens the settings screen.
    pub settings_action_label: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            fallback_message: "Permission disabled. You can enable it from app settings."
                .to_string(),
            settings_action_label: "Settings".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Load global config
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let global = load_config_file(&global_path)?;
            merge_config(&mut config, global);
        }
    }

    // Apply environment overrides
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".softperm").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/softperm/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("softperm").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    // Merge history config
    if overlay.history.database_path.is_some() {
        base.history.database_path = overlay.history.database_path;
    }

    // Merge notice config
    base.notice = overlay.notice;

    // Merge logging config
    base.logging = overlay.logging;
}

fn apply_env_overrides(config: &mut Config) {
    apply_env_overrides_from(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_from(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("SOFTPERM_HISTORY_PATH") {
        config.history.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = var("SOFTPERM_FALLBACK_MSG") {
        config.notice.fallback_message = val;
    }
    if let Some(val) = var("SOFTPERM_LOG_LEVEL") {
        config.logging.log_level = val;
    }
}
