//! Error types and Result aliases for runmd

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for runmd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for runmd
#[derive(Debug)]
pub enum Error {
    // === Document errors ===
    /// Target markdown document does not exist
    FileNotFound {
        path: PathBuf,
    },

    // === Execution errors ===
    /// The shell interpreter could not be launched
    CommandSpawnFailed {
        command: String,
        reason: String,
    },

    /// Command exceeded the configured timeout
    CommandTimeout {
        command: String,
        duration: Duration,
    },

    // === Interactive session errors ===
    /// Block index does not exist in the document
    BlockIndexOutOfRange {
        index: usize,
        total: usize,
    },

    /// Block is already executing
    BlockAlreadyRunning {
        index: usize,
    },

    /// Another block in the document is executing
    SessionBusy {
        running: usize,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === I/O errors ===
    /// I/O errors
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Document errors
            Error::FileNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }

            // Execution errors
            Error::CommandSpawnFailed { command, reason } => {
                write!(f, "Failed to spawn command '{}': {}", command, reason)
            }
            Error::CommandTimeout { command, duration } => {
                write!(f, "Command '{}' timed out after {:?}", command, duration)
            }

            // Session errors
            Error::BlockIndexOutOfRange { index, total } => {
                write!(f, "Block {} does not exist (document has {} blocks)", index, total)
            }
            Error::BlockAlreadyRunning { index } => {
                write!(f, "Block {} is already running", index)
            }
            Error::SessionBusy { running } => {
                write!(f, "Block {} is still running", running)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }

            // I/O errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
