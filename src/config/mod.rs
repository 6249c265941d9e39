//! Configuration management for runmd
//!
//! Holds the settings that shape how a document is executed: which
//! interpreter runs each block, where the dotenv file lives, which fence
//! languages count as runnable, and the headless runner defaults.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

pub use loader::ConfigLoader;

/// Fence languages treated as runnable shell code
pub const DEFAULT_SHELL_LANGUAGES: [&str; 4] = ["sh", "bash", "shell", "zsh"];

/// Conventional dotenv file name looked up next to the document
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Main configuration structure for runmd
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Interpreter configuration
    pub shell: ShellConfig,

    /// Environment file configuration
    pub env: EnvConfig,

    /// Batch runner configuration
    pub runner: RunnerConfig,
}

/// Interpreter used to execute every block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell executable
    pub program: String,

    /// Arguments placed before the command string
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string()],
        }
    }
}

/// Dotenv lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvConfig {
    /// File name of the dotenv file, relative to the document's directory
    pub file: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_ENV_FILE.to_string(),
        }
    }
}

/// Headless runner defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Skip remaining blocks once one has failed
    pub fail_fast: bool,

    /// Fence languages that are extracted and executed
    pub languages: Vec<String>,

    /// Per-command timeout in seconds, 0 disables it
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            languages: DEFAULT_SHELL_LANGUAGES
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            timeout_secs: 0,
        }
    }
}

impl RunnerConfig {
    /// Languages as a lower-cased lookup set
    pub fn language_set(&self) -> BTreeSet<String> {
        self.languages
            .iter()
            .map(|lang| lang.trim().to_lowercase())
            .filter(|lang| !lang.is_empty())
            .collect()
    }

    /// Timeout as a `Duration`, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
