//! Dotenv file loading
//!
//! `KEY=value` lines, `#` comments, optional single or double quotes around
//! the value. Lines without `=` are skipped without complaint.

use super::EnvMap;
use crate::config::DEFAULT_ENV_FILE;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load the conventional `.env` file from `dir`
///
/// A missing file yields an empty map, not an error.
pub fn load_env(dir: &Path) -> Result<EnvMap> {
    load_env_file(dir, DEFAULT_ENV_FILE)
}

/// Load a dotenv file named `file_name` from `dir`
///
/// Bytes that are not valid UTF-8 decode to U+FFFD.
pub fn load_env_file(dir: &Path, file_name: &str) -> Result<EnvMap> {
    let path = dir.join(file_name);
    if !path.is_file() {
        debug!("No env file at {}", path.display());
        return Ok(EnvMap::new());
    }

    let bytes = fs::read(&path)?;
    let env = parse_env(&String::from_utf8_lossy(&bytes));
    debug!("Loaded {} variables from {}", env.len(), path.display());
    Ok(env)
}

/// Parse dotenv text into a map; later duplicates overwrite earlier ones
pub fn parse_env(text: &str) -> EnvMap {
    let mut env = EnvMap::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };

        env.insert(key.trim().to_string(), strip_quotes(value.trim()).to_string());
    }

    env
}

/// Strip one pair of matching surrounding quotes, no escape processing
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
