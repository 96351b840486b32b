//! Error types for hwmd operations.
//!
//! Only [`HwError::InsufficientPrivilege`] is fatal for a run; every other
//! variant is converted into a logged event or a typed outcome at the
//! component boundary that produced it.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for hwmd operations.
#[derive(Error, Debug)]
pub enum HwError {
    // Process errors
    #[error("Must be run as root / sudo")]
    InsufficientPrivilege,

    // Configuration errors
    #[error("Settings file could not be read: {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    #[error("Settings parse error: {0}")]
    ConfigParse(String),

    #[error("Could not determine home directory")]
    NoHomeDir,

    // Persistence errors
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot {path}: {source}")]
    WriteSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl HwError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPrivilege
                | Self::ConfigRead { .. }
                | Self::ConfigParse(_)
                | Self::CreateDir { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InsufficientPrivilege => Some("Run again with: sudo hwmd"),
            Self::ConfigRead { .. } | Self::ConfigParse(_) => {
                Some("Check settings.toml in the settings directory (--settings-dir)")
            }
            Self::CreateDir { .. } | Self::WriteSnapshot { .. } => {
                Some("Set SNAPSHOTS_PATH to a writable directory")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using HwError.
pub type Result<T> = std::result::Result<T, HwError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| HwError::Other(format!("{}: {e}", f().into())))
    }
}
