//! Build commands

use std::path::Path;

use crate::core::error::FlowResult;
use crate::flow::Workflow;

pub fn run_check_snapshots(root: &Path) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  workflow.check_snapshot_dependencies()?;
  println!("✅ No unreleased dependencies");
  Ok(())
}

/// Set the project version and report the version read back from the descriptor
pub fn run_set_version(root: &Path, version: &str) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  workflow.set_versions(version)?;
  match workflow.current_project_version() {
    Ok(current) => println!("✅ Project version is now {}", current),
    Err(_) => println!("✅ Version update requested: {}", version),
  }
  Ok(())
}

pub fn run_goals(root: &Path, goals: &str) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  workflow.run_goals(goals)
}
