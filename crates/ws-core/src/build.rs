//! The build orchestrator.
//!
//! Runs package scripts in dependency order and keeps link state
//! reconciled around each build: consumer-side links are checked before a
//! build so it compiles against local dependencies, provider-side links
//! after, so fresh output reaches every consumer.

use std::path::Path;

use ws_npm::PackageManifest;
use ws_process::EnvOverlay;

use crate::config::Workspace;
use crate::link::{self, LinkOutcome};
use crate::resolver;
use crate::{Error, Result};

/// Knobs for one build/run invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build transitive dependencies first.
    pub recursive: bool,
    /// Skip link reconciliation and use published packages only.
    pub published: bool,
    /// Prefer a `test:watch` script when running tests.
    pub watch: bool,
}

/// Runs scripts across the workspace with link reconciliation.
pub struct BuildOrchestrator<'a> {
    root: &'a Path,
    ws: &'a Workspace,
    opts: BuildOptions,
    env: EnvOverlay,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(root: &'a Path, ws: &'a Workspace, opts: BuildOptions, env: EnvOverlay) -> Self {
        Self {
            root,
            ws,
            opts,
            env,
        }
    }

    /// Builds `target`, preceded by its resolved dependencies when the
    /// recursive option is set.
    ///
    /// A failing dependency halts the chain; the target is never built on
    /// top of a broken dependency.
    pub fn build(&self, target: &str) -> Result<()> {
        if self.opts.recursive {
            for dep in resolver::resolve(self.ws, target) {
                let Some(def) = self.ws.repos.get(&dep) else {
                    continue;
                };
                if !self.ws.repo_dir(self.root, def).is_dir() {
                    println!("skipping {dep}: not cloned");
                    continue;
                }
                self.run_script(&dep, "build")
                    .map_err(|err| Error::DependencyBuildFailed {
                        name: dep.clone(),
                        source: Box::new(err),
                    })?;
            }
        }
        self.run_script(target, "build")
    }

    /// Runs one script in one repository.
    pub fn run_script(&self, name: &str, script: &str) -> Result<()> {
        let def = self.ws.repo(name)?;
        let dir = self.ws.repo_dir(self.root, def);
        if !dir.is_dir() {
            return Err(Error::RepoMissing {
                name: name.to_string(),
                path: dir,
            });
        }

        let reconcile_links = script == "build" && !self.opts.published;
        if reconcile_links {
            self.reconcile_consumer_links(name);
        }

        let command = self
            .script_command(name, &dir, script)?
            .ok_or_else(|| Error::ScriptNotFound {
                script: script.to_string(),
                repo: name.to_string(),
                available: PackageManifest::load(&dir)
                    .ok()
                    .flatten()
                    .map(|manifest| manifest.script_names())
                    .unwrap_or_default(),
            })?;

        println!("=== {name}: {command} ===");
        let status = ws_process::shell(&dir, &command, &self.env)?;
        if !status.success() {
            return Err(Error::BuildFailed {
                repo: name.to_string(),
                script: script.to_string(),
                code: status.code(),
            });
        }

        if reconcile_links {
            self.reconcile_provider_links(name);
        }
        Ok(())
    }

    /// Points `name` at locally-built dependencies before its build.
    fn reconcile_consumer_links(&self, name: &str) {
        for rule in self.ws.provider_rules_for(name) {
            match link::reconcile(self.root, self.ws, rule, &self.env) {
                Ok(LinkOutcome::Linked) => {
                    println!("linked {} into {}", rule.package, rule.consumer);
                }
                Ok(LinkOutcome::Skipped(reason)) => {
                    tracing::debug!(package = %rule.package, reason, "link skipped");
                }
                Err(err) => {
                    tracing::warn!(package = %rule.package, %err, "link failed");
                }
            }
        }
    }

    /// Pushes `name`'s fresh build output to its consumers.
    fn reconcile_provider_links(&self, name: &str) {
        for rule in self.ws.consumer_rules_for(name) {
            match link::reconcile(self.root, self.ws, rule, &self.env) {
                Ok(LinkOutcome::Linked) => {
                    println!("linked {} into {}", rule.package, rule.consumer);
                }
                Ok(LinkOutcome::Skipped(reason)) => {
                    tracing::debug!(package = %rule.package, reason, "link skipped");
                }
                Err(err) => {
                    tracing::warn!(package = %rule.package, %err, "link failed");
                }
            }
        }
    }

    /// The shell command for `script` in this repo, or `None` when neither
    /// a package script nor a toolchain fallback applies.
    fn script_command(&self, name: &str, dir: &Path, script: &str) -> Result<Option<String>> {
        let Some(manifest) = PackageManifest::load(dir)? else {
            return Ok(fallback_command(dir, script));
        };

        if self.opts.watch && script == "test" && manifest.has_script("test:watch") {
            return Ok(Some("npm run test:watch".to_string()));
        }
        // Package providers prefer a build:all script so every published
        // artifact is rebuilt, not just the default target.
        if script == "build" && self.ws.is_provider(name) && manifest.has_script("build:all") {
            return Ok(Some("npm run build:all".to_string()));
        }
        if manifest.has_script(script) {
            if script == "test" {
                return Ok(Some("npm test".to_string()));
            }
            return Ok(Some(format!("npm run {script}")));
        }
        Ok(fallback_command(dir, script))
    }
}

/// Toolchain fallback for repositories without a matching package script.
fn fallback_command(dir: &Path, script: &str) -> Option<String> {
    let gradle = |d: &Path| {
        d.join("build.gradle").is_file() || d.join("build.gradle.kts").is_file()
    };
    match script {
        "build" => {
            if gradle(dir) {
                Some("./gradlew build".to_string())
            } else if dir.join("Makefile").is_file() {
                Some("make".to_string())
            } else if dir.join("Cargo.toml").is_file() {
                Some("cargo build".to_string())
            } else {
                None
            }
        }
        "test" => {
            if gradle(dir) {
                Some("./gradlew test".to_string())
            } else if dir.join("Cargo.toml").is_file() {
                Some("cargo test".to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}
