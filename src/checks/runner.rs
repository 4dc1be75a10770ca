//! Check runner for executing health checks

use super::trait_def::{Check, CheckContext, CheckResult};
use std::sync::Arc;

/// Runs registered checks in order
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results.
  ///
  /// A check that fails to run becomes an error result instead of aborting the rest.
  pub fn run_all(&self, ctx: &CheckContext) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for check in &self.checks {
      if check.is_expensive() && !ctx.thorough {
        continue;
      }

      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => {
          results.push(CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            err.help_message(),
          ));
        }
      }
    }

    results
  }

  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::config::ConfigCheck));
  runner.add_check(Arc::new(super::branches::BranchModelCheck));
  runner.add_check(Arc::new(super::working_tree::WorkingTreeCheck));
  runner.add_check(Arc::new(super::snapshots::SnapshotDependencyCheck));
  runner.add_check(Arc::new(super::remotes::RemoteSyncCheck));

  runner
}
