//! npm link plumbing and artifact detection.

use std::path::Path;
use std::process::{Command, Stdio};

use ws_process::EnvOverlay;

use crate::{Error, Result};

/// Verifies npm is installed and launchable.
pub fn check_npm() -> Result<()> {
    let result = Command::new("npm")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => Err(Error::NpmMissing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NpmMissing),
        Err(e) => Err(Error::Io(e)),
    }
}

fn run_npm(dir: &Path, args: &[&str], env: &EnvOverlay) -> Result<()> {
    tracing::debug!(dir = %dir.display(), ?args, "running npm");
    let mut cmd = Command::new("npm");
    cmd.args(args).current_dir(dir);
    env.apply(&mut cmd);
    let status = cmd.status().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NpmMissing
        } else {
            Error::Io(e)
        }
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Command {
            command: args.join(" "),
            dir: dir.to_path_buf(),
        })
    }
}

/// Registers the package in `dir` as a globally resolvable link
/// (`npm link`).
pub fn link(dir: &Path, env: &EnvOverlay) -> Result<()> {
    run_npm(dir, &["link"], env)
}

/// Points `dir` at a previously registered link (`npm link <pkg>`).
pub fn link_package(dir: &Path, pkg: &str, env: &EnvOverlay) -> Result<()> {
    run_npm(dir, &["link", pkg], env)
}

/// Removes a consumption link (`npm unlink <pkg>`).
pub fn unlink(dir: &Path, pkg: &str, env: &EnvOverlay) -> Result<()> {
    run_npm(dir, &["unlink", pkg], env)
}

/// Whether a build output directory holds a linkable package: the
/// artifact manifest must be present.
pub fn is_built(artifact_dir: &Path) -> bool {
    artifact_dir.join("package.json").exists()
}

/// Whether `pkg` inside `dir/node_modules` currently resolves through a
/// symlink, i.e. a local link rather than an installed release.
pub fn is_linked(dir: &Path, pkg: &str) -> bool {
    let path = dir.join("node_modules").join(pkg);
    path.symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}
