//! Cloud CLI presence and credential refresh.

use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Verifies the aws CLI is installed and launchable.
pub fn check_cli() -> Result<()> {
    let result = Command::new("aws")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => Err(Error::CliMissing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::CliMissing),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Probes whether the current session is valid, quietly.
///
/// An error here means credentials are expired or missing; callers follow
/// up with [`sso_login`].
pub fn caller_identity(profile: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("aws");
    cmd.args(["sts", "get-caller-identity"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(profile) = profile {
        cmd.args(["--profile", profile]);
    }

    let status = cmd.status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Provider {
            message: "credentials expired or missing".into(),
        })
    }
}

/// Runs `aws sso login`, streaming output so the user can complete the
/// browser flow.
pub fn sso_login(profile: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("aws");
    cmd.args(["sso", "login"]);
    if let Some(profile) = profile {
        cmd.args(["--profile", profile]);
    }

    let status = cmd.status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::LoginFailed {
            message: format!("aws sso login exited with {status}"),
        })
    }
}
