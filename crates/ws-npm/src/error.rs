//! Error types for ws-npm

use std::path::PathBuf;

/// Result type for npm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving npm or reading package manifests
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// npm is not installed or not on PATH
    #[error("npm not found; install Node.js from https://nodejs.org")]
    NpmMissing,

    /// An npm command exited with a non-zero status
    #[error("npm {command} failed in {}", dir.display())]
    Command { command: String, dir: PathBuf },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// package.json could not be parsed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
