//! Core engine for gitflow-mvn
//!
//! - **config**: `gitflow.toml` parsing and validation
//! - **context**: per-run argument line and user properties
//! - **error**: error types with exit codes and contextual help
//! - **exec**: synchronous external command execution
//! - **validate**: rejection of shell control characters in configured values
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod validate;
pub mod vcs;
