//! CLI commands for gitflow-mvn
//!
//! ## Setup & Inspection
//! - **init**: write gitflow.toml and the git config cache
//! - **doctor**: run health checks
//!
//! ## Branches
//! - **branch**: checkout/create with branch-type configuration, branch and tag listing, sync and clean checks
//!
//! ## Build
//! - **build**: snapshot dependency check, version update, goal runs
//!
//! All commands take the project root they operate on.

pub mod branch;
pub mod build;
pub mod doctor;
pub mod init;

pub use branch::{run_branches, run_check_clean, run_checkout, run_create, run_sync_check, run_tags};
pub use build::{run_check_snapshots, run_goals, run_set_version};
pub use doctor::run_doctor;
pub use init::run_init;
