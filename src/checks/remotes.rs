//! Remote sync check for the long-lived branches

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::FlowConfig;
use crate::core::error::{FlowError, FlowResult};
use crate::core::vcs::SystemGit;

/// Fetches the production and development branches and compares them with the remote
pub struct RemoteSyncCheck;

impl Check for RemoteSyncCheck {
  fn name(&self) -> &str {
    "remote-sync"
  }

  fn description(&self) -> &str {
    "Checks that local production and development branches are not behind the remote"
  }

  fn is_expensive(&self) -> bool {
    true
  }

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
    let config = FlowConfig::load(&ctx.project_root)?;
    if !config.git.fetch_remote {
      return Ok(CheckResult::pass(self.name(), "Remote fetching disabled, skipping"));
    }
    let git = SystemGit::open(&ctx.project_root, &config)?;

    let mut behind = Vec::new();
    let mut checked = 0;
    for branch in [&config.flow.production_branch, &config.flow.development_branch] {
      if !git.branch_exists(branch)? {
        continue;
      }
      checked += 1;
      match git.fetch_and_compare(branch) {
        Ok(()) => {}
        Err(FlowError::Workflow(err)) => behind.push(err.to_string()),
        Err(err) => return Err(err),
      }
    }

    if behind.is_empty() {
      Ok(CheckResult::pass(
        self.name(),
        format!("{} branch(es) up to date with '{}'", checked, config.flow.origin),
      ))
    } else {
      Ok(CheckResult::error(self.name(), behind.join("; "), Some("Execute git pull")))
    }
  }
}
