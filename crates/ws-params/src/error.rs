//! Error types for ws-params

/// Result type for parameter store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the parameter store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The aws CLI is not installed or not on PATH
    #[error("aws CLI not found; install it from https://aws.amazon.com/cli/")]
    CliMissing,

    /// The provider rejected the request; message is its stderr, verbatim
    #[error("{message}")]
    Provider { message: String },

    /// Login failed after the credential probe
    #[error("AWS login failed: {message}")]
    LoginFailed { message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The provider response was not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
