//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// Workspace Manager - keep a multi-repo workspace synced and built
#[derive(Parser, Debug)]
#[command(name = "ws")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch and rebase every repository (or one) onto its default branch
    ///
    /// Examples:
    ///   ws sync                  # sync every repo
    ///   ws sync WidgetAPI        # sync one repo
    ///   ws sync -b develop       # sync against a specific branch
    ///   ws sync -i --env beta    # refresh .env and install changed deps
    Sync {
        /// Sync only this repository
        repo: Option<String>,

        /// Target branch, overriding configured defaults
        #[arg(short, long)]
        branch: Option<String>,

        /// Pull instead of rebasing local branches
        #[arg(long)]
        no_rebase: bool,

        /// Refresh the workspace .env from the parameter store. Takes an
        /// environment name; without one, the configured param_env applies
        #[arg(long)]
        env: Option<Option<String>>,

        /// Run npm install where the lockfile changed
        #[arg(short, long)]
        install: bool,

        /// Update scoped packages to their latest published versions
        #[arg(short, long)]
        update: bool,
    },

    /// Run a package script in the repository containing the current
    /// directory
    ///
    /// Examples:
    ///   ws run build             # build this repo
    ///   ws run build -r          # build dependencies first
    ///   ws run test -w           # prefer test:watch when available
    ///   ws run start             # npm run start
    Run {
        /// Script name (build, test, start, ...)
        script: String,

        /// Build resolved dependencies before the target
        #[arg(short, long)]
        recursive: bool,

        /// Skip link reconciliation; use published packages only
        #[arg(long)]
        published: bool,

        /// Prefer a watch variant of the test script
        #[arg(short, long)]
        watch: bool,
    },
}
