//! Uncommitted changes check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::FlowConfig;
use crate::core::error::FlowResult;
use crate::core::vcs::SystemGit;

pub struct WorkingTreeCheck;

impl Check for WorkingTreeCheck {
  fn name(&self) -> &str {
    "working-tree"
  }

  fn description(&self) -> &str {
    "Checks for uncommitted changes in the working tree and index"
  }

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
    let config = FlowConfig::load(&ctx.project_root)?;
    let git = SystemGit::open(&ctx.project_root, &config)?;

    if git.has_uncommitted_changes()? {
      Ok(CheckResult::warning(
        self.name(),
        "You have some uncommitted files",
        Some("Commit or discard local changes before starting a workflow"),
      ))
    } else {
      Ok(CheckResult::pass(self.name(), "Working tree clean"))
    }
  }
}
