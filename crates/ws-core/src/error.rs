//! Error types for ws-core

use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Result type for ws-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ws-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No workspace configuration above the starting directory
    #[error("no workspace found: {CONFIG_FILE} not located above {}", start.display())]
    WorkspaceNotFound { start: PathBuf },

    /// A repository name is not declared in the workspace
    #[error("repo '{name}' not found in workspace")]
    RepoNotFound { name: String },

    /// A declared repository has no checkout on disk
    #[error("repo directory missing for '{name}': expected it at {}", path.display())]
    RepoMissing { name: String, path: PathBuf },

    /// The current directory is not inside any workspace repository
    #[error("not inside a repo directory")]
    NotInRepo,

    /// The requested script does not exist for the repository
    #[error("script '{script}' not found in {repo}{}", available_hint(available))]
    ScriptNotFound {
        script: String,
        repo: String,
        /// Scripts the repository's manifest does define
        available: Vec<String>,
    },

    /// A build or script invocation exited non-zero
    #[error("{script} failed in {repo}")]
    BuildFailed {
        repo: String,
        script: String,
        code: Option<i32>,
    },

    /// A dependency in a recursive build failed, halting the chain
    #[error("dependency build failed at '{name}'")]
    DependencyBuildFailed {
        name: String,
        #[source]
        source: Box<Error>,
    },

    // Transparent wrappers for underlying crate errors
    /// Git error from ws-git
    #[error(transparent)]
    Git(#[from] ws_git::Error),

    /// npm error from ws-npm
    #[error(transparent)]
    Npm(#[from] ws_npm::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

impl Error {
    /// The exit code to propagate when a child process failed, if the
    /// failure carries one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::BuildFailed { code, .. } => *code,
            Error::DependencyBuildFailed { source, .. } => source.exit_code(),
            _ => None,
        }
    }
}
