//! Repository health checks for the `doctor` command
//!
//! # Built-in Checks
//!
//! - **config**: gitflow.toml parses and passes the validation guard
//! - **branch-model**: production and development branches exist
//! - **working-tree**: no uncommitted changes
//! - **snapshot-dependencies**: no unreleased dependencies outside the reactor
//! - **remote-sync**: long-lived branches are not behind the remote (`--thorough`)

mod branches;
mod config;
mod remotes;
mod runner;
mod snapshots;
mod trait_def;
mod working_tree;

pub use runner::{CheckRunner, create_default_runner};
pub use trait_def::{Check, CheckContext, CheckResult, Severity};
