use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
}

/// Sizes of the top-N tables and of the console error preview. The slowest
/// operations list and the error sample are fixed-size and not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_screens: usize,
    pub top_actions: usize,
    pub top_operations: usize,
    pub recent_errors_shown: usize,
    pub error_preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_screens: 5,
            top_actions: 10,
            top_operations: 10,
            recent_errors_shown: 5,
            error_preview_chars: 100,
        }
    }
}

impl Config {
    /// Loads `<config dir>/sessionlens/config.toml`, falling back to defaults
    /// when it is absent or unreadable.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Ignoring config file {}: {}", config_path.display(), e),
                }
            }
        }
        debug!("Using default configuration");
        Ok(Config::default())
    }

    /// Loads an explicitly requested config file; missing or malformed files are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AnalyzerError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        let config = toml::from_str::<Config>(&content)
            .map_err(|e| AnalyzerError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sessionlens").join("config.toml"))
    }
}
