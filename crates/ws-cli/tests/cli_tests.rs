//! Black-box tests of the `ws` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use ws_test_utils::git as fixtures;

fn ws() -> Command {
    Command::cargo_bin("ws").unwrap()
}

#[test]
fn no_command_prints_hint() {
    ws()
        .assert()
        .success()
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn help_lists_commands() {
    ws()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn sync_outside_workspace_fails() {
    let temp = TempDir::new().unwrap();
    ws()
        .current_dir(temp.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no workspace found"));
}

#[test]
fn run_outside_any_repo_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("workspace.toml"),
        "[repos.App]\npath = \"App\"\n",
    )
    .unwrap();

    ws()
        .current_dir(temp.path())
        .args(["run", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside a repo"));
}

#[test]
fn sync_reports_each_repo() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("root");
    std::fs::create_dir_all(&root).unwrap();
    fixtures::repo_with_origin(&temp.path().join("remotes/App.git"), &root.join("App"));
    std::fs::write(
        root.join("workspace.toml"),
        "default_branch = \"main\"\n\n[repos.App]\npath = \"App\"\n\n[repos.Ghost]\npath = \"Ghost\"\n",
    )
    .unwrap();

    ws()
        .current_dir(&root)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("App"))
        .stdout(predicate::str::contains("not cloned"))
        .stdout(predicate::str::contains("1 synced, 1 skipped, 0 failed"));
}

#[test]
fn sync_unknown_repo_fails_with_name() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("workspace.toml"), "").unwrap();

    ws()
        .current_dir(temp.path())
        .args(["sync", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost"));
}

#[test]
fn run_reports_failing_builds() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("workspace.toml"),
        "[repos.App]\npath = \"App\"\n",
    )
    .unwrap();
    let dir = temp.path().join("App");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("Makefile"), "all:\n\t@exit 7\n").unwrap();

    ws()
        .current_dir(&dir)
        .args(["run", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("build failed in App"));
}
