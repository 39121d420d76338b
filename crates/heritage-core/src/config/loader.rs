//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::HeritageConfig;
use crate::{HeritageError, Result};

/// Config file names, in discovery priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".heritagerc.toml", ".heritagerc.json", "heritage.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Each directory is checked for [`CONFIG_FILE_NAMES`] in order, moving up
    /// until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| HeritageError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// `.toml` files are read as TOML, everything else as JSON.
    pub fn load_from_file(path: &Path) -> Result<HeritageConfig> {
        let content = fs::read_to_string(path).map_err(|e| HeritageError::io_error(path, e))?;

        let config: HeritageConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                HeritageError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                HeritageError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the nearest config above
    /// `start_dir` (default: current directory) is used, falling back to the
    /// built-in defaults when there is none.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<HeritageConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(HeritageError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(HeritageConfig::default())
            }
        }
    }
}
