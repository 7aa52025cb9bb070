//! Git repository fixtures driven by the `git` CLI.
//!
//! Sync and build tests need real repositories with history, local
//! branches, and an `origin` remote they can fall behind. Everything here
//! panics on failure so test setup problems surface immediately.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Runs a git command in `dir`, panicking with stderr on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("fixture: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "fixture: `git {args:?}` in {} failed:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Initialises a real git repository with one commit on `main`.
///
/// Configures `user.email`, `user.name`, and disables commit signing so the
/// fixture works on any machine.
pub fn repo_with_commit(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    // Older git versions default to master
    let _ = Command::new("git")
        .args(["branch", "-m", "main"])
        .current_dir(path)
        .output();
}

/// Creates a bare repository at `origin` and a working clone at `work`
/// whose `main` tracks `origin/main` with one shared commit.
pub fn repo_with_origin(origin: &Path, work: &Path) {
    fs::create_dir_all(origin).unwrap();
    git(origin, &["init", "--bare"]);

    repo_with_commit(work);
    git(work, &["remote", "add", "origin", &origin.display().to_string()]);
    git(work, &["push", "-u", "origin", "main"]);
    // Older git versions leave a bare repo's HEAD on master even after
    // main is pushed, which breaks later clones of the origin.
    git(origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

/// Adds a commit touching `filename` directly to a bare `origin`, using
/// `scratch` as a throwaway clone. Leaves any working clone of the same
/// origin one commit behind.
pub fn advance_origin(origin: &Path, scratch: &Path, filename: &str) {
    fs::create_dir_all(scratch).unwrap();
    git(scratch, &["clone", &origin.display().to_string(), "."]);
    git(scratch, &["config", "user.email", "test@test.com"]);
    git(scratch, &["config", "user.name", "Test User"]);
    git(scratch, &["config", "commit.gpgsign", "false"]);

    fs::write(scratch.join(filename), "upstream change").unwrap();
    git(scratch, &["add", "."]);
    git(scratch, &["commit", "-m", "Upstream change"]);
    git(scratch, &["push", "origin", "HEAD:main"]);
}

/// Commits a new file in an existing fixture repository.
pub fn commit_file(repo: &Path, filename: &str, content: &str) {
    fs::write(repo.join(filename), content).unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", &format!("Add {filename}")]);
}

/// Creates a local branch without switching to it.
pub fn create_branch(repo: &Path, name: &str) {
    git(repo, &["branch", name]);
}
