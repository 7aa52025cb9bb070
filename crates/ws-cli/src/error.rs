//! Error type for the CLI

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user at the top level
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ws_core::Error),

    #[error(transparent)]
    Npm(#[from] ws_npm::Error),

    #[error(transparent)]
    Params(#[from] ws_params::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: a failed child's own code where one exists,
    /// otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(err) => err.exit_code().unwrap_or(1),
            _ => 1,
        }
    }
}
