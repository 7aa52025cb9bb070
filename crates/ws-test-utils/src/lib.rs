//! Shared test fixtures for Workspace Manager.

pub mod git;
