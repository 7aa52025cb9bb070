//! Operations against a single git working tree.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// A handle to one repository checkout.
///
/// Holds only the directory; every operation shells out to `git` and
/// observes fresh state, so a `GitRepo` is cheap to create and safe to
/// keep across mutations of the working tree.
#[derive(Debug, Clone)]
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the directory contains a `.git` database.
    pub fn is_repo(&self) -> bool {
        self.dir.join(".git").is_dir()
    }

    /// Clones `remote` into `target` with output streamed to the user.
    pub fn clone_from(remote: &str, target: &Path) -> Result<GitRepo> {
        let status = Command::new("git")
            .args(["clone", remote])
            .arg(target)
            .status()?;
        if !status.success() {
            return Err(Error::Command {
                command: "clone".into(),
                message: format!("could not clone {remote}"),
            });
        }
        Ok(GitRepo::new(target))
    }

    /// Runs a git command and returns its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: stderr.trim().to_string(),
            })
        }
    }

    /// Runs a git command with all output discarded.
    ///
    /// Used during bulk sync where dozens of fetches and rebases would
    /// otherwise flood the status report.
    fn run_quiet(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(?args, dir = %self.dir.display(), "running git");
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: format!("git {} exited with {status}", args.join(" ")),
            })
        }
    }

    /// Fetches `remote` (default `origin`) quietly.
    pub fn fetch(&self, remote: &str) -> Result<()> {
        let remote = if remote.is_empty() { "origin" } else { remote };
        self.run_quiet(&["fetch", remote])
    }

    /// Runs `git pull` with output streamed to the user.
    pub fn pull(&self) -> Result<()> {
        let status = Command::new("git")
            .arg("pull")
            .current_dir(&self.dir)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Command {
                command: "pull".into(),
                message: format!("git pull exited with {status}"),
            })
        }
    }

    /// Rebases the checked-out branch onto `upstream`, quietly.
    pub fn rebase(&self, upstream: &str) -> Result<()> {
        self.run_quiet(&["rebase", upstream])
    }

    /// Aborts an in-progress rebase, quietly.
    pub fn rebase_abort(&self) -> Result<()> {
        self.run_quiet(&["rebase", "--abort"])
    }

    /// Checks out `branch`, quietly.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run_quiet(&["checkout", branch])
    }

    /// Name of the currently checked-out branch.
    pub fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// All local branch names.
    pub fn local_branches(&self) -> Result<Vec<String>> {
        let output = self.run(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Commits `branch` is ahead of and behind `upstream` by.
    pub fn ahead_behind(&self, branch: &str, upstream: &str) -> Result<(u32, u32)> {
        let output = self.run(&[
            "rev-list",
            "--left-right",
            "--count",
            &format!("{branch}...{upstream}"),
        ])?;

        let mut parts = output.split_whitespace();
        let ahead = parts.next().and_then(|n| n.parse().ok());
        let behind = parts.next().and_then(|n| n.parse().ok());
        match (ahead, behind) {
            (Some(ahead), Some(behind)) => Ok((ahead, behind)),
            _ => Err(Error::UnexpectedOutput {
                message: format!("rev-list --count returned {output:?}"),
            }),
        }
    }

    /// Whether the working tree has uncommitted changes.
    ///
    /// Errors degrade to `false`: a repository we cannot ask is treated as
    /// clean and the following operation will fail with a clearer message.
    pub fn is_dirty(&self) -> bool {
        self.status_short().map(|s| !s.is_empty()).unwrap_or(false)
    }

    /// `git status --short` output.
    pub fn status_short(&self) -> Result<String> {
        self.run(&["status", "--short"])
    }

    /// `git status --short` with ANSI colors preserved.
    pub fn status_short_color(&self) -> Result<String> {
        let output = Command::new("git")
            .args(["status", "--short", "--color=always"])
            .current_dir(&self.dir)
            .output()?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout)
                .trim_end_matches('\n')
                .to_string())
        } else {
            Err(Error::Command {
                command: "status".into(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// The remote-advertised default branch, falling back to probing
    /// `origin/main` and `origin/prod`, then to `"main"`.
    pub fn default_branch(&self) -> String {
        if let Ok(r) = self.run(&["symbolic-ref", "refs/remotes/origin/HEAD"]) {
            if let Some(name) = r.rsplit('/').next() {
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }

        for branch in ["main", "prod"] {
            if self
                .run(&["rev-parse", "--verify", &format!("origin/{branch}")])
                .is_ok()
            {
                return branch.to_string();
            }
        }

        "main".to_string()
    }
}
