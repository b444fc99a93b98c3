pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{AnalysisConfig, Config, RelationConfig};

const CONFIG_FILE_NAME: &str = ".kube-tadm.toml";

/// Get the global config file path (~/.kube-tadm.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.kube-tadm.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
/// Checks local config first, then global config
pub fn load_config(project_path: Option<&Path>) -> Result<Config> {
    // Try local config first
    if let Some(path) = project_path {
        let local = local_config_path(path);
        if local.exists() {
            return load_config_file(&local);
        }
    }

    // Try global config
    if let Some(global) = global_config_path() {
        if global.exists() {
            match load_config_file(&global) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Ignoring global configuration: {}", e),
            }
        }
    }

    Ok(Config::default())
}

/// Load an explicitly named configuration file
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
