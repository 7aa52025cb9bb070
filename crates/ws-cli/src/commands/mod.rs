//! Command implementations.

mod run;
mod sync;

pub use run::{RunArgs, run_script};
pub use sync::{SyncArgs, run_sync};

use std::path::Path;
use std::process::Command;

use ws_core::{Workspace, envfile};
use ws_process::EnvOverlay;

use crate::error::Result;

/// The overlay handed to every child process: the workspace `.env` file
/// with the config's `[env]` table layered on top.
///
/// Installing private scoped packages needs a GitHub token; when neither
/// the overlay nor the process environment carries one, the gh CLI's
/// stored credentials fill the gap.
pub(crate) fn child_env(root: &Path, ws: &Workspace) -> Result<EnvOverlay> {
    let mut env: EnvOverlay = envfile::read_global_env(root)?.into_iter().collect();
    env.extend(ws.env.clone());
    if !env.contains("GITHUB_TOKEN") && std::env::var_os("GITHUB_TOKEN").is_none() {
        if let Some(token) = gh_auth_token() {
            env.set("GITHUB_TOKEN", token);
        }
    }
    Ok(env)
}

/// The token gh holds for the current login, if gh is installed and
/// authenticated.
fn gh_auth_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_env_overrides_env_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), "A=from-file\nB=file-only\n").unwrap();

        let mut ws = Workspace::default();
        ws.env.insert("A".to_string(), "from-config".to_string());

        let env = child_env(temp.path(), &ws).unwrap();
        assert_eq!(env.get("A"), Some("from-config"));
        assert_eq!(env.get("B"), Some("file-only"));
    }

    #[test]
    fn configured_github_token_suppresses_gh_probe() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), "GITHUB_TOKEN=from-file\n").unwrap();

        let env = child_env(temp.path(), &Workspace::default()).unwrap();
        assert_eq!(env.get("GITHUB_TOKEN"), Some("from-file"));
    }

    #[test]
    fn config_github_token_wins_over_gh() {
        let temp = TempDir::new().unwrap();

        let mut ws = Workspace::default();
        ws.env
            .insert("GITHUB_TOKEN".to_string(), "from-config".to_string());

        let env = child_env(temp.path(), &ws).unwrap();
        assert_eq!(env.get("GITHUB_TOKEN"), Some("from-config"));
    }
}
