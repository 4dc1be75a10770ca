//! Unreleased dependency check over the whole reactor

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::build::pom::{PomLoader, Reactor};
use crate::build::snapshots::find_unreleased_dependencies;
use crate::core::error::FlowResult;
use std::collections::BTreeMap;

pub struct SnapshotDependencyCheck;

impl Check for SnapshotDependencyCheck {
  fn name(&self) -> &str {
    "snapshot-dependencies"
  }

  fn description(&self) -> &str {
    "Finds SNAPSHOT dependencies not produced by this build"
  }

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
    if !ctx.project_root.join("pom.xml").is_file() {
      return Ok(CheckResult::pass(self.name(), "No pom.xml found, skipping"));
    }

    let loader = PomLoader::new();
    let properties = BTreeMap::new();
    let reactor = Reactor::discover(&ctx.project_root, &loader, &properties)?;
    let violations = find_unreleased_dependencies(reactor.descriptors(), &loader, &properties)?;

    if violations.is_empty() {
      return Ok(CheckResult::pass(
        self.name(),
        format!("No unreleased dependencies in {} module(s)", reactor.descriptors().len()),
      ));
    }

    Ok(
      CheckResult::warning(
        self.name(),
        format!("{} SNAPSHOT dependencies found", violations.len()),
        Some("Change them to released versions before starting a release"),
      )
      .with_details(serde_json::json!({ "violations": violations })),
    )
  }
}
