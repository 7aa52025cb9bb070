//! Git subprocess operations for Workspace Manager.
//!
//! All version control access goes through the `git` CLI; this crate only
//! sequences and interprets those calls. Operations are stateless against a
//! single working tree.

pub mod error;
pub mod naming;
pub mod repo;

pub use error::{Error, Result};
pub use naming::build_remote_url;
pub use repo::GitRepo;
