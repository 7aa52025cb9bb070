//! Parameter store retrieval and credential refresh.
//!
//! Secrets live in AWS SSM Parameter Store and are fetched through the
//! `aws` CLI so the user's existing profiles and SSO sessions apply.
//! Provider error text is surfaced verbatim.

pub mod auth;
pub mod error;
pub mod ssm;

pub use auth::{caller_identity, check_cli, sso_login};
pub use error::{Error, Result};
pub use ssm::ParamClient;
