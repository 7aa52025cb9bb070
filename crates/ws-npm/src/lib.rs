//! npm and package.json operations for Workspace Manager.
//!
//! Stateless operations against one package directory: manifest parsing,
//! link/unlink, built-artifact detection, and link-presence detection.
//! Package management itself stays in npm; this crate sequences calls to it.

pub mod error;
pub mod link;
pub mod manifest;

pub use error::{Error, Result};
pub use link::{check_npm, is_built, is_linked, link, link_package, unlink};
pub use manifest::PackageManifest;
