//! Subprocess launching with explicit environment overlays.
//!
//! Every child process in the workspace manager is launched through this
//! crate. Extra variables (workspace `.env`, injected tokens, profile
//! selection) travel as an immutable [`EnvOverlay`] handed to each launch
//! instead of being written into the parent process environment.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// An immutable set of environment variables layered on top of the
/// inherited process environment when a child is launched.
///
/// Later insertions win; the overlay never mutates the parent environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Creates an empty overlay (child inherits the parent environment).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Copies every entry of `other` into this overlay, with `other`
    /// taking precedence on conflicts.
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, String)>) {
        self.vars.extend(other);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies the overlay to a command. The child still inherits the
    /// parent environment; overlay entries shadow inherited values.
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in &self.vars {
            cmd.env(key, value);
        }
    }
}

impl FromIterator<(String, String)> for EnvOverlay {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Runs `sh -c <command>` in `dir` with the overlay applied and stdio
/// inherited, so build output streams straight to the user.
pub fn shell(dir: &Path, command: &str, env: &EnvOverlay) -> std::io::Result<ExitStatus> {
    tracing::debug!(dir = %dir.display(), command, "running shell command");
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(dir);
    env.apply(&mut cmd);
    cmd.status()
}

/// Runs `sh -c <command>` in `dir` with the overlay applied and all output
/// discarded. Used for bulk maintenance steps where per-command output
/// would flood the status report.
pub fn shell_quiet(dir: &Path, command: &str, env: &EnvOverlay) -> std::io::Result<ExitStatus> {
    tracing::debug!(dir = %dir.display(), command, "running quiet shell command");
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    env.apply(&mut cmd);
    cmd.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn overlay_set_and_get() {
        let mut env = EnvOverlay::new();
        assert!(env.is_empty());
        env.set("FOO", "bar");
        assert_eq!(env.get("FOO"), Some("bar"));
        assert!(env.contains("FOO"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn overlay_later_set_wins() {
        let env = EnvOverlay::new().with("KEY", "old").with("KEY", "new");
        assert_eq!(env.get("KEY"), Some("new"));
    }

    #[test]
    fn overlay_extend_takes_precedence() {
        let mut env = EnvOverlay::new().with("A", "1").with("B", "2");
        env.extend([("B".to_string(), "override".to_string())]);
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("override"));
    }

    #[test]
    fn overlay_from_iterator() {
        let env: EnvOverlay = [("X".to_string(), "y".to_string())].into_iter().collect();
        assert_eq!(env.get("X"), Some("y"));
    }

    #[test]
    fn shell_reports_exit_status() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverlay::new();

        let ok = shell_quiet(temp.path(), "true", &env).unwrap();
        assert!(ok.success());

        let failed = shell_quiet(temp.path(), "exit 3", &env).unwrap();
        assert_eq!(failed.code(), Some(3));
    }

    #[test]
    fn shell_sees_overlay_variables() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverlay::new().with("WS_PROBE", "42");

        let status = shell_quiet(temp.path(), "test \"$WS_PROBE\" = 42", &env).unwrap();
        assert!(status.success());
    }
}
