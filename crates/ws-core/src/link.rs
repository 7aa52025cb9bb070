//! The link state machine.
//!
//! Decides whether a consumer repository should be pointed at a
//! locally-built dependency or its published package, and performs the
//! transition idempotently. State is derived fresh from the filesystem on
//! every call and never cached across runs.

use std::path::Path;

use ws_process::EnvOverlay;

use crate::config::{LinkRule, Workspace};
use crate::Result;

/// Skip reason when the provider has no build output.
pub const SKIP_NO_BUILD: &str = "no local build, using published package";

/// Skip reason when the consumer already resolves the local build.
pub const SKIP_ALREADY_LINKED: &str = "already linked";

/// Where a consumer currently gets one dependency from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// The provider has no build artifacts; the consumer uses the
    /// published package.
    NotBuilt,
    /// Artifacts exist but the consumer still resolves the published
    /// package.
    BuiltUnlinked,
    /// The consumer resolves the local build through a link.
    Linked,
}

impl LinkState {
    /// Observes the current state from two facts: artifact presence in
    /// the provider and link presence in the consumer.
    pub fn observe(artifact_dir: &Path, consumer_dir: &Path, package: &str) -> Self {
        if !ws_npm::is_built(artifact_dir) {
            LinkState::NotBuilt
        } else if ws_npm::is_linked(consumer_dir, package) {
            LinkState::Linked
        } else {
            LinkState::BuiltUnlinked
        }
    }
}

/// Outcome of one reconciliation. Failure is the error leg of the
/// `Result`; callers downgrade it to a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Nothing to do; the reason says why.
    Skipped(&'static str),
    /// The consumer now resolves the local build.
    Linked,
}

/// Reconciles one link rule.
///
/// Registers the provider's build output as a globally resolvable package
/// and creates the consumption link inside the consumer. Idempotent: a
/// second call with unchanged artifacts reports `Skipped("already
/// linked")`. A partial registration is not rolled back on failure; the
/// next reconciliation picks it up.
pub fn reconcile(
    root: &Path,
    ws: &Workspace,
    rule: &LinkRule,
    env: &EnvOverlay,
) -> Result<LinkOutcome> {
    let Some(provider) = ws.repos.get(&rule.provider) else {
        return Ok(LinkOutcome::Skipped("provider not in workspace"));
    };
    let Some(consumer) = ws.repos.get(&rule.consumer) else {
        return Ok(LinkOutcome::Skipped("consumer not in workspace"));
    };

    let consumer_dir = ws.repo_dir(root, consumer);
    if !consumer_dir.exists() {
        return Ok(LinkOutcome::Skipped("consumer not cloned"));
    }
    let artifact_dir = ws.repo_dir(root, provider).join(&rule.artifact_dir);

    match LinkState::observe(&artifact_dir, &consumer_dir, &rule.package) {
        LinkState::NotBuilt => {
            // A link left behind after the artifacts disappeared would
            // break resolution; drop it and fall back to published.
            if ws_npm::is_linked(&consumer_dir, &rule.package) {
                ws_npm::unlink(&consumer_dir, &rule.package, env)?;
            }
            Ok(LinkOutcome::Skipped(SKIP_NO_BUILD))
        }
        LinkState::Linked => Ok(LinkOutcome::Skipped(SKIP_ALREADY_LINKED)),
        LinkState::BuiltUnlinked => {
            tracing::debug!(
                provider = %rule.provider,
                consumer = %rule.consumer,
                package = %rule.package,
                "linking local build"
            );
            ws_npm::link(&artifact_dir, env)?;
            ws_npm::link_package(&consumer_dir, &rule.package, env)?;
            Ok(LinkOutcome::Linked)
        }
    }
}
