//! Error types for ws-git

/// Result type for git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the `git` CLI
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A git command exited with a non-zero status
    #[error("git {command} failed: {message}")]
    Command { command: String, message: String },

    /// The git binary could not be launched
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Output from git was not in the expected shape
    #[error("unexpected git output: {message}")]
    UnexpectedOutput { message: String },
}
