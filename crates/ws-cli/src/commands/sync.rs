//! `ws sync` implementation.

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use ws_core::{
    SyncEngine, SyncOptions, SyncResult, SyncStatus, SyncSummary, Workspace, editor, envfile,
};
use ws_params::ParamClient;
use ws_process::EnvOverlay;

use crate::error::Result;
use crate::report;

/// Environment used when neither the command line nor the workspace
/// config names one.
const DEFAULT_PARAM_ENV: &str = "beta";

/// Arguments for one sync run, straight off the command line.
///
/// `env` distinguishes a bare `--env` (refresh against the configured
/// default) from `--env <name>` (refresh against that environment).
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub no_rebase: bool,
    pub env: Option<Option<String>>,
    pub install: bool,
    pub update: bool,
}

/// Parameter-store environment for a refresh: the command-line value,
/// then the workspace's `param_env`, then "beta".
fn param_env_name<'a>(requested: Option<&'a str>, ws: &'a Workspace) -> &'a str {
    requested
        .or(ws.param_env.as_deref())
        .unwrap_or(DEFAULT_PARAM_ENV)
}

pub fn run_sync(cwd: &Path, args: SyncArgs) -> Result<()> {
    let root = Workspace::find(cwd)?;
    let ws = Workspace::load(&root)?;

    let opts = SyncOptions {
        branch: args.branch.clone(),
        no_rebase: args.no_rebase,
    };
    let engine = SyncEngine::new(&root, &ws, opts);
    let results = match &args.repo {
        Some(name) => vec![engine.sync_one(name)?],
        None => engine.sync_all(),
    };

    for result in &results {
        println!("{}", report::sync_line(result));
    }

    // Maintenance steps are best-effort: a failed env refresh or install
    // must not turn an otherwise successful sync into a failure.
    if let Some(requested) = &args.env {
        let env_name = param_env_name(requested.as_deref(), &ws);
        if let Err(err) = refresh_env(&root, &ws, env_name) {
            eprintln!("{}: env refresh failed: {}", "warning".yellow().bold(), err);
        }
    }

    if args.install || args.update {
        ws_npm::check_npm()?;
    }

    let env = super::child_env(&root, &ws)?;
    if args.install {
        install_changed(&root, &ws, &results, &env);
    }
    if args.update {
        update_scoped(&root, &ws, &env);
    }

    // The editor workspace file tracks cloned repos, so any sync can
    // change what belongs in it.
    editor::generate(&root, &ws)?;

    if args.repo.is_none() {
        println!();
        println!("{}", report::summary_line(&SyncSummary::tally(&results)));
    }
    Ok(())
}

/// Rewrites the workspace `.env` from the parameter store.
///
/// Expired credentials trigger an interactive SSO login before the fetch.
fn refresh_env(root: &Path, ws: &Workspace, env_name: &str) -> Result<()> {
    ws_params::check_cli()?;
    let profile = ws.aws_profile.as_deref();
    if ws_params::caller_identity(profile).is_err() {
        ws_params::sso_login(profile)?;
    }

    let client = ParamClient::new(profile, env_name, ws.aws_region.as_deref().unwrap_or(""));
    let suffixes: Vec<String> = ws.params.values().cloned().collect();
    let fetched = client.fetch_many(&suffixes)?;

    let mut vars = BTreeMap::new();
    for (key, suffix) in &ws.params {
        match fetched.get(suffix) {
            Some(value) => {
                vars.insert(key.clone(), value.clone());
            }
            None => tracing::warn!(key, suffix, "parameter not returned by provider"),
        }
    }
    vars.insert("AWS_REGION".to_string(), client.region().to_string());
    vars.insert("APP_ENV".to_string(), env_name.to_string());
    for (key, value) in &ws.env {
        vars.insert(key.clone(), value.clone());
    }

    envfile::write_global_env(root, &vars)?;
    println!(
        "wrote {} values to {}",
        vars.len(),
        envfile::global_env_path(root).display()
    );
    Ok(())
}

/// Runs `npm install` in every repo whose lockfile changed during the
/// sync. Failures are reported and skipped.
fn install_changed(root: &Path, ws: &Workspace, results: &[SyncResult], env: &EnvOverlay) {
    for result in results {
        if result.status != SyncStatus::Synced || !result.lockfile_changed {
            continue;
        }
        let Some(def) = ws.repos.get(&result.name) else {
            continue;
        };
        let dir = ws.repo_dir(root, def);
        println!("installing dependencies in {}", result.name.bold());
        match ws_process::shell_quiet(&dir, "npm install --no-audit --no-fund", env) {
            Ok(status) if status.success() => {}
            Ok(status) => eprintln!(
                "{}: npm install in {} exited with {status}",
                "warning".yellow().bold(),
                result.name
            ),
            Err(err) => eprintln!(
                "{}: npm install in {} failed: {err}",
                "warning".yellow().bold(),
                result.name
            ),
        }
    }
}

/// Bumps every dependency under the workspace package scope to its latest
/// published version, repo by repo. Failures are reported and skipped.
fn update_scoped(root: &Path, ws: &Workspace, env: &EnvOverlay) {
    let Some(scope) = ws.package_scope.as_deref() else {
        eprintln!(
            "{}: no package_scope configured, skipping update",
            "warning".yellow().bold()
        );
        return;
    };

    for (name, def) in &ws.repos {
        let dir = ws.repo_dir(root, def);
        if !dir.is_dir() {
            continue;
        }
        let manifest = match ws_npm::PackageManifest::load(&dir) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => continue,
            Err(err) => {
                eprintln!(
                    "{}: could not read package manifest in {name}: {err}",
                    "warning".yellow().bold()
                );
                continue;
            }
        };

        for package in manifest.scoped_dependencies(scope) {
            println!("updating {package} in {}", name.bold());
            let command = format!("npm install {package}@latest --save");
            match ws_process::shell_quiet(&dir, &command, env) {
                Ok(status) if status.success() => {}
                _ => eprintln!(
                    "{}: update of {package} in {name} failed",
                    "warning".yellow().bold()
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ws_test_utils::git as fixtures;

    fn workspace_root(temp: &TempDir) -> std::path::PathBuf {
        let root = temp.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn sync_fails_outside_a_workspace() {
        let temp = TempDir::new().unwrap();
        let err = run_sync(temp.path(), SyncArgs::default()).unwrap_err();
        assert!(err.to_string().contains("no workspace found"));
    }

    #[test]
    fn sync_runs_over_a_real_workspace() {
        let temp = TempDir::new().unwrap();
        let root = workspace_root(&temp);
        fixtures::repo_with_origin(&temp.path().join("remotes/App.git"), &root.join("App"));
        std::fs::write(
            root.join("workspace.toml"),
            "default_branch = \"main\"\n\n[repos.App]\npath = \"App\"\n",
        )
        .unwrap();

        run_sync(&root, SyncArgs::default()).unwrap();

        // A full sync regenerates the editor workspace file.
        let editor_file = editor::workspace_file_path(&root);
        assert!(editor_file.is_file());
        let content = std::fs::read_to_string(editor_file).unwrap();
        assert!(content.contains("\"App\""));
    }

    #[test]
    fn single_repo_sync_regenerates_editor_file() {
        let temp = TempDir::new().unwrap();
        let root = workspace_root(&temp);
        fixtures::repo_with_origin(&temp.path().join("remotes/App.git"), &root.join("App"));
        std::fs::write(
            root.join("workspace.toml"),
            "default_branch = \"main\"\n\n[repos.App]\npath = \"App\"\n",
        )
        .unwrap();

        run_sync(
            &root,
            SyncArgs {
                repo: Some("App".to_string()),
                ..SyncArgs::default()
            },
        )
        .unwrap();
        assert!(editor::workspace_file_path(&root).is_file());
    }

    #[test]
    fn param_env_falls_back_to_config_then_default() {
        let mut ws = Workspace::default();
        assert_eq!(param_env_name(None, &ws), "beta");

        ws.param_env = Some("gamma".to_string());
        assert_eq!(param_env_name(None, &ws), "gamma");
        assert_eq!(param_env_name(Some("prod"), &ws), "prod");
    }

    #[test]
    fn sync_unknown_repo_is_an_error() {
        let temp = TempDir::new().unwrap();
        let root = workspace_root(&temp);
        std::fs::write(root.join("workspace.toml"), "").unwrap();

        let err = run_sync(
            &root,
            SyncArgs {
                repo: Some("Ghost".to_string()),
                ..SyncArgs::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }
}
