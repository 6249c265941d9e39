//! Configuration File Loading
//!
//! Finds and loads the TOML configuration file from the usual locations,
//! falling back to built-in defaults when nothing usable is found.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "RUNMD_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
        }
    }

    /// Load configuration from the default locations
    ///
    /// Discovered files that fail to parse are skipped with a warning.
    pub fn load() -> Result<Config> {
        Self::new().load_from_search_paths()
    }

    /// Load configuration from an explicit path
    ///
    /// Unlike discovery, a missing or invalid explicit file is an error.
    pub fn load_from_path(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: "Configuration file does not exist".to_string(),
            });
        }

        let config = Self::load_config_file(path)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration from CLI override, environment, then search paths
    pub fn resolve(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load_from_path(Path::new(&path));
            }
        }

        Self::load()
    }

    fn load_from_search_paths(&self) -> Result<Config> {
        for path in &self.search_paths {
            if !path.exists() {
                continue;
            }

            match Self::load_config_file(path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    return Ok(config);
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path.display(), e);
                    continue;
                }
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Load and validate a specific configuration file
    fn load_config_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
            format: "TOML".to_string(),
            reason: e.to_string(),
        })?;

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("runmd").join("config.toml"));
        }

        // XDG config home fallback (for platforms that might set it)
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            let candidate = PathBuf::from(xdg_config).join("runmd").join("config.toml");
            if !paths.contains(&candidate) {
                paths.push(candidate);
            }
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".runmd").join("config.toml"));
        }

        paths
    }

    /// Validate configuration
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.shell.program.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "shell.program".to_string(),
                reason: "Shell program cannot be empty".to_string(),
            });
        }

        if config.env.file.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "env.file".to_string(),
                reason: "Env file name cannot be empty".to_string(),
            });
        }

        if config.runner.language_set().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "runner.languages".to_string(),
                reason: "At least one shell language is required".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
