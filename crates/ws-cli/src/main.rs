//! Workspace Manager CLI
//!
//! The command-line interface for syncing and building a multi-repo
//! workspace.

mod cli;
mod commands;
mod error;
mod report;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    if let Err(e) = run(cli) {
        let code = e.exit_code();
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Sync {
            repo,
            branch,
            no_rebase,
            env,
            install,
            update,
        }) => {
            let cwd = std::env::current_dir()?;
            commands::run_sync(
                &cwd,
                commands::SyncArgs {
                    repo,
                    branch,
                    no_rebase,
                    env,
                    install,
                    update,
                },
            )
        }
        Some(Commands::Run {
            script,
            recursive,
            published,
            watch,
        }) => {
            let cwd = std::env::current_dir()?;
            commands::run_script(
                &cwd,
                &script,
                commands::RunArgs {
                    recursive,
                    published,
                    watch,
                },
            )
        }
        None => {
            // No command provided - show help hint
            println!("{} Workspace Manager", "ws".green().bold());
            println!();
            println!("Run {} for available commands.", "ws --help".cyan());
            Ok(())
        }
    }
}
