//! The sync engine.
//!
//! Brings every checkout up to date in two phases: a parallel fetch
//! fan-out, then a sequential per-repo rebase pass. Per-repo failures are
//! contained in the result record; only configuration errors abort a run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ws_git::GitRepo;

use crate::config::Workspace;
use crate::{Error, Result};

/// The dependency lockfile watched for changes across a sync.
pub const LOCKFILE: &str = "package-lock.json";

/// How one repository came out of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Branches were rebased (or already current).
    Synced,
    /// The repo was left untouched, e.g. dirty tree or missing checkout.
    Skipped,
    /// The primary rebase (or pull) failed; the tree was restored.
    Failed,
}

/// Per-repository outcome record.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub name: String,
    /// Target branch the repo was synced against.
    pub branch: String,
    pub status: SyncStatus,
    /// Commits the current branch is ahead of / behind its upstream,
    /// measured after the sync (before it, for skips and failures).
    pub ahead: u32,
    pub behind: u32,
    pub dirty: bool,
    /// `git status --short` snapshot when the repo was skipped dirty.
    pub dirty_status: String,
    /// Human-readable detail: skip reason, failure description, or a
    /// summary of secondary branch rebases.
    pub message: String,
    /// Whether the dependency lockfile changed during the sync.
    pub lockfile_changed: bool,
}

impl SyncResult {
    fn skipped(name: &str, branch: &str, message: impl Into<String>) -> Self {
        SyncResult {
            name: name.to_string(),
            branch: branch.to_string(),
            status: SyncStatus::Skipped,
            ahead: 0,
            behind: 0,
            dirty: false,
            dirty_status: String::new(),
            message: message.into(),
            lockfile_changed: false,
        }
    }

    fn failed(name: &str, branch: &str, message: impl Into<String>) -> Self {
        SyncResult {
            status: SyncStatus::Failed,
            ..SyncResult::skipped(name, branch, message)
        }
    }
}

/// Knobs for one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Sync against this branch instead of each repo's default.
    pub branch: Option<String>,
    /// Pull the current branch instead of rebasing local branches.
    pub no_rebase: bool,
}

/// Aggregate counts over a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn tally(results: &[SyncResult]) -> Self {
        let mut summary = SyncSummary::default();
        for result in results {
            match result.status {
                SyncStatus::Synced => summary.synced += 1,
                SyncStatus::Skipped => summary.skipped += 1,
                SyncStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}

/// Clones a missing checkout from its configured remote, with clone
/// output streamed to the user.
fn clone_repo(name: &str, remote: &str, dir: &Path) -> Result<()> {
    let url = ws_git::build_remote_url(remote);
    println!("cloning {name} from {url}");
    GitRepo::clone_from(&url, dir)?;
    Ok(())
}

/// Size and mtime stand in for lockfile content; both change whenever npm
/// rewrites the file.
fn lockfile_fingerprint(path: &Path) -> Option<(u64, SystemTime)> {
    let meta = std::fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    Some((meta.len(), modified))
}

/// Drives sync over one workspace.
pub struct SyncEngine<'a> {
    root: &'a Path,
    ws: &'a Workspace,
    opts: SyncOptions,
}

impl<'a> SyncEngine<'a> {
    pub fn new(root: &'a Path, ws: &'a Workspace, opts: SyncOptions) -> Self {
        Self { root, ws, opts }
    }

    /// Syncs every configured repository.
    ///
    /// Phase 1 fetches all existing checkouts in parallel, ignoring fetch
    /// failures (the later rebase surfaces real problems with context).
    /// Phase 2 walks repositories in name order and syncs each
    /// sequentially.
    pub fn sync_all(&self) -> Vec<SyncResult> {
        let dirs: BTreeMap<&str, PathBuf> = self
            .ws
            .repos
            .iter()
            .map(|(name, def)| (name.as_str(), self.ws.repo_dir(self.root, def)))
            .collect();

        std::thread::scope(|scope| {
            for (name, dir) in &dirs {
                if dir.is_dir() {
                    scope.spawn(move || {
                        if let Err(err) = GitRepo::new(dir).fetch("origin") {
                            tracing::debug!(repo = name, %err, "fetch failed");
                        }
                    });
                }
            }
        });

        self.ws
            .repos
            .iter()
            .map(|(name, def)| {
                let dir = &dirs[name.as_str()];
                if dir.is_dir() {
                    self.sync_repo(name, dir)
                } else if let Some(remote) = &def.remote {
                    match clone_repo(name, remote, dir) {
                        Ok(()) => self.sync_repo(name, dir),
                        Err(err) => {
                            SyncResult::failed(name, &self.target_branch(name), err.to_string())
                        }
                    }
                } else {
                    SyncResult::skipped(name, &self.target_branch(name), "not cloned")
                }
            })
            .collect()
    }

    /// Syncs a single named repository, fetching first.
    ///
    /// Unlike [`sync_all`](Self::sync_all), an unknown name or missing
    /// checkout is a hard error here: the user asked for this repo
    /// specifically.
    pub fn sync_one(&self, name: &str) -> Result<SyncResult> {
        let def = self.ws.repo(name)?;
        let dir = self.ws.repo_dir(self.root, def);
        if !dir.is_dir() {
            match &def.remote {
                Some(remote) => clone_repo(name, remote, &dir)?,
                None => {
                    return Err(Error::RepoMissing {
                        name: name.to_string(),
                        path: dir,
                    });
                }
            }
        }

        let repo = GitRepo::new(&dir);
        if let Err(err) = repo.fetch("origin") {
            tracing::debug!(repo = name, %err, "fetch failed");
        }
        Ok(self.sync_repo(name, &dir))
    }

    /// Branch this repo syncs against: run override, then per-repo
    /// config, then workspace config, then the remote-advertised default.
    fn target_branch(&self, name: &str) -> String {
        if let Some(branch) = &self.opts.branch {
            return branch.clone();
        }
        let def = self.ws.repos.get(name);
        if let Some(branch) = def.and_then(|d| d.default_branch.as_ref()) {
            return branch.clone();
        }
        if let Some(branch) = &self.ws.default_branch {
            return branch.clone();
        }
        match def {
            Some(def) => GitRepo::new(self.ws.repo_dir(self.root, def)).default_branch(),
            None => "main".to_string(),
        }
    }

    fn sync_repo(&self, name: &str, dir: &Path) -> SyncResult {
        let repo = GitRepo::new(dir);
        let target = self.target_branch(name);
        let upstream = format!("origin/{target}");

        let current = match repo.current_branch() {
            Ok(branch) => branch,
            Err(err) => return SyncResult::failed(name, &target, err.to_string()),
        };

        let (ahead, behind) = repo.ahead_behind(&current, &upstream).unwrap_or((0, 0));

        if repo.is_dirty() {
            let dirty_status = repo
                .status_short_color()
                .or_else(|_| repo.status_short())
                .unwrap_or_default();
            return SyncResult {
                name: name.to_string(),
                branch: current,
                status: SyncStatus::Skipped,
                ahead,
                behind,
                dirty: true,
                dirty_status,
                message: "dirty working tree".to_string(),
                lockfile_changed: false,
            };
        }

        if self.opts.no_rebase {
            return match repo.pull() {
                Ok(()) => SyncResult {
                    name: name.to_string(),
                    branch: current,
                    status: SyncStatus::Synced,
                    ahead,
                    behind,
                    dirty: false,
                    dirty_status: String::new(),
                    message: String::new(),
                    lockfile_changed: false,
                },
                Err(err) => SyncResult::failed(name, &current, err.to_string()),
            };
        }

        let lock_path = dir.join(LOCKFILE);
        let lock_before = lockfile_fingerprint(&lock_path);

        let branches = repo.local_branches().unwrap_or_default();

        // The checked-out branch rebases first; a conflict here fails the
        // whole repo since secondary branches would rebase onto a stale
        // target.
        if let Err(err) = repo.rebase(&upstream) {
            let _ = repo.rebase_abort();
            tracing::debug!(repo = name, branch = %current, %err, "rebase failed");
            return SyncResult::failed(
                name,
                &current,
                format!("rebase {current} onto {upstream} failed"),
            );
        }

        let mut rebased = Vec::new();
        let mut failed = Vec::new();
        for branch in &branches {
            if branch == &current || branch == &target {
                continue;
            }
            if repo.checkout(branch).is_err() {
                failed.push(branch.clone());
                continue;
            }
            match repo.rebase(&upstream) {
                Ok(()) => rebased.push(branch.clone()),
                Err(_) => {
                    let _ = repo.rebase_abort();
                    failed.push(branch.clone());
                }
            }
        }

        // Always land back on the starting branch, even when a secondary
        // rebase left the tree on another branch.
        let _ = repo.checkout(&current);

        let lockfile_changed = lockfile_fingerprint(&lock_path) != lock_before;
        let (ahead, behind) = repo.ahead_behind(&current, &upstream).unwrap_or((0, 0));

        let mut notes = Vec::new();
        if !rebased.is_empty() {
            notes.push(format!("+{} branches rebased", rebased.len()));
        }
        if !failed.is_empty() {
            notes.push(format!(
                "{} branch rebase(s) failed: {}",
                failed.len(),
                failed.join(", ")
            ));
        }

        SyncResult {
            name: name.to_string(),
            branch: current,
            status: SyncStatus::Synced,
            ahead,
            behind,
            dirty: false,
            dirty_status: String::new(),
            message: notes.join(", "),
            lockfile_changed,
        }
    }
}
