/// Error types for berri-launch
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for berri-launch operations
#[derive(Error, Debug)]
pub enum LaunchError {
    /// I/O errors (open, seek, read past end of file, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shortcut is missing a structure we need, or an offset points nowhere
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid byte sequence inside a decoded string
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Persisted history snapshot is corrupt or unreadable
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// A scan directory could not be listed at all
    #[error("Could not read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for berri-launch operations
pub type Result<T> = std::result::Result<T, LaunchError>;

impl LaunchError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        LaunchError::Format(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        LaunchError::Encoding(msg.into())
    }

    /// Whether this error only affects a single shortcut.
    ///
    /// The resolver drops the entry and keeps going for these.
    pub fn is_entry_skippable(&self) -> bool {
        matches!(
            self,
            LaunchError::Io(_) | LaunchError::Format(_) | LaunchError::Encoding(_)
        )
    }

    /// Convert LaunchError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LaunchError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            LaunchError::Format(msg) => {
                format!("Shortcut could not be read: {}", msg)
            }
            LaunchError::Encoding(msg) => {
                format!("Shortcut contains unreadable text: {}", msg)
            }
            LaunchError::Snapshot(msg) => {
                format!("History cache is damaged and was ignored: {}", msg)
            }
            LaunchError::DirectoryUnreadable { path, source } => {
                format!("Could not list '{}'. Details: {}", path.display(), source)
            }
            LaunchError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            LaunchError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
        }
    }
}
