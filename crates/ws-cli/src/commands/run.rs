//! `ws run` implementation.

use std::path::Path;

use ws_core::{BuildOptions, BuildOrchestrator, Workspace};

use crate::error::Result;

/// Arguments for one script run.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub recursive: bool,
    pub published: bool,
    pub watch: bool,
}

/// Runs `script` in the repository containing `cwd`.
///
/// The repo is inferred from the working directory rather than named, so
/// `ws run build` does the right thing wherever it is invoked.
pub fn run_script(cwd: &Path, script: &str, args: RunArgs) -> Result<()> {
    let root = Workspace::find(cwd)?;
    let ws = Workspace::load(&root)?;
    let name = ws.repo_containing(&root, cwd)?;

    let env = super::child_env(&root, &ws)?;
    let opts = BuildOptions {
        recursive: args.recursive,
        published: args.published,
        watch: args.watch,
    };
    let orchestrator = BuildOrchestrator::new(&root, &ws, opts, env);

    if script == "build" {
        orchestrator.build(&name)?;
    } else {
        orchestrator.run_script(&name, script)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fails_outside_a_workspace() {
        let temp = TempDir::new().unwrap();
        let err = run_script(temp.path(), "build", RunArgs::default()).unwrap_err();
        assert!(err.to_string().contains("no workspace found"));
    }

    #[test]
    fn fails_outside_any_repo_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("workspace.toml"),
            "[repos.App]\npath = \"App\"\n",
        )
        .unwrap();

        let err = run_script(temp.path(), "build", RunArgs::default()).unwrap_err();
        assert!(err.to_string().contains("not inside a repo"));
    }

    #[test]
    fn runs_a_script_through_the_shell() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("workspace.toml"),
            "[repos.App]\npath = \"App\"\n",
        )
        .unwrap();
        let dir = temp.path().join("App");
        std::fs::create_dir_all(&dir).unwrap();
        // A Makefile fallback keeps the test independent of npm.
        std::fs::write(dir.join("Makefile"), "all:\n\t@touch ran.txt\n").unwrap();

        run_script(&dir, "build", RunArgs::default()).unwrap();
        assert!(dir.join("ran.txt").is_file());
    }

    #[test]
    fn unknown_script_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("workspace.toml"),
            "[repos.App]\npath = \"App\"\n",
        )
        .unwrap();
        let dir = temp.path().join("App");
        std::fs::create_dir_all(&dir).unwrap();

        let err = run_script(&dir, "deploy", RunArgs::default()).unwrap_err();
        assert!(err.to_string().contains("deploy"));
    }
}
