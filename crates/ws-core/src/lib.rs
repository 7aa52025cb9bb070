//! Core orchestration for Workspace Manager.
//!
//! This crate coordinates the leaf operation crates into the two engines
//! with real invariants:
//!
//! - **SyncEngine**: parallel fetch then sequential multi-branch rebase,
//!   with dirty-tree skips, per-branch failure containment, and an
//!   unconditional restoration of the starting branch.
//! - **BuildOrchestrator**: recursive dependency resolution plus the link
//!   state machine that switches a consumer between a locally-built
//!   dependency and its published package.
//!
//! # Architecture
//!
//! ```text
//!                 ws-cli
//!                    |
//!                 ws-core
//!                    |
//!     +--------+-----+-----+----------+
//!     |        |           |          |
//!  ws-git   ws-npm   ws-process   ws-params
//! ```
//!
//! Everything below ws-core is a stateless subprocess wrapper; everything
//! above it is presentation.

pub mod build;
pub mod config;
pub mod editor;
pub mod envfile;
pub mod error;
pub mod link;
pub mod resolver;
pub mod sync;

pub use build::{BuildOptions, BuildOrchestrator};
pub use config::{CONFIG_FILE, LinkRule, RepoDef, Workspace};
pub use error::{Error, Result};
pub use link::{LinkOutcome, LinkState};
pub use resolver::resolve;
pub use sync::{SyncEngine, SyncOptions, SyncResult, SyncStatus, SyncSummary};
