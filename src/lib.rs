//! gitflow-mvn: git-flow branch lifecycle automation for Maven projects
//!
//! The engine drives the system `git` and `mvn` executables:
//! - [`core`]: configuration, errors, command execution, git operations
//! - [`flow`]: branch types, argument line editing, workflow orchestration
//! - [`build`]: Maven operations, pom.xml loading, snapshot scan
//! - [`checks`]: health checks for the `doctor` command
//! - [`commands`]: CLI command implementations

pub mod build;
pub mod checks;
pub mod commands;
pub mod core;
pub mod flow;

pub use crate::core::config::FlowConfig;
pub use crate::core::error::{FlowError, FlowResult};
pub use crate::flow::{BranchType, Workflow};
