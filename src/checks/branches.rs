//! Branching model check: the long-lived branches exist and have valid names

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::FlowConfig;
use crate::core::error::FlowResult;
use crate::core::vcs::SystemGit;

pub struct BranchModelCheck;

impl Check for BranchModelCheck {
  fn name(&self) -> &str {
    "branch-model"
  }

  fn description(&self) -> &str {
    "Checks that the production and development branches exist locally"
  }

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
    let config = FlowConfig::load(&ctx.project_root)?;
    let git = SystemGit::open(&ctx.project_root, &config)?;

    if !config.flow.not_same_prod_dev_name() {
      return Ok(CheckResult::warning(
        self.name(),
        format!(
          "Production and development branch are both '{}'",
          config.flow.production_branch
        ),
        Some("Use distinct names unless you intentionally run without a development branch"),
      ));
    }

    let mut issues = Vec::new();
    for branch in [&config.flow.production_branch, &config.flow.development_branch] {
      if !git.is_valid_branch_name(branch)? {
        issues.push(format!("'{}' is not a valid branch name", branch));
      } else if !git.branch_exists(branch)? {
        issues.push(format!("'{}' branch does not exist", branch));
      }
    }

    if issues.is_empty() {
      Ok(CheckResult::pass(self.name(), "Production and development branches present"))
    } else {
      Ok(CheckResult::error(
        self.name(),
        issues.join("; "),
        Some("Create the missing branches or fix [flow] in gitflow.toml"),
      ))
    }
  }
}
