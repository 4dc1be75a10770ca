//! Build tool (Maven) side of the workflow
//!
//! - **maven**: version updates and goal invocations
//! - **pom**: project descriptor loading and reactor discovery
//! - **snapshots**: unreleased dependency scan

pub mod maven;
pub mod pom;
pub mod snapshots;

pub use maven::Maven;
pub use pom::{DependencyRecord, PomLoader, ProjectLoader, ProjectModel, Reactor};
pub use snapshots::{check_no_unreleased_dependencies, find_unreleased_dependencies, is_snapshot};
