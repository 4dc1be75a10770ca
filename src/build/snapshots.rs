//! Unreleased (snapshot) dependency detection across the reactor

use crate::build::pom::{DependencyRecord, ProjectLoader};
use crate::core::error::{FlowError, FlowResult, WorkflowError};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{info, warn};

const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Deployed snapshot form: `<base>-yyyyMMdd.HHmmss-<build>`
static TIMESTAMPED: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("valid pattern"));

/// Whether `version` denotes an unreleased build
pub fn is_snapshot(version: &str) -> bool {
  version.to_ascii_uppercase().ends_with(SNAPSHOT_SUFFIX) || TIMESTAMPED.is_match(version)
}

/// Every snapshot dependency not produced by the reactor, as `module -> dependency`.
///
/// Each descriptor is reloaded from disk. All reactor coordinates are collected
/// before dependencies are judged, so module order does not matter.
pub fn find_unreleased_dependencies(
  descriptors: &[PathBuf],
  loader: &dyn ProjectLoader,
  user_properties: &BTreeMap<String, String>,
) -> FlowResult<Vec<String>> {
  let models = descriptors
    .iter()
    .map(|path| loader.load(path, user_properties))
    .collect::<FlowResult<Vec<_>>>()?;

  let produced: BTreeSet<&DependencyRecord> = models.iter().map(|m| &m.coordinate).collect();
  let produced = &produced;

  let violations = models
    .iter()
    .flat_map(|model| {
      model
        .dependencies
        .iter()
        .filter(move |dep| is_snapshot(&dep.version) && !produced.contains(*dep))
        .map(move |dep| format!("{} -> {}", model.coordinate, dep))
    })
    .collect();

  Ok(violations)
}

/// Fail when any module depends on an unreleased artifact built elsewhere.
///
/// Violations are all logged before the single aggregate error.
pub fn check_no_unreleased_dependencies(
  descriptors: &[PathBuf],
  loader: &dyn ProjectLoader,
  user_properties: &BTreeMap<String, String>,
) -> FlowResult<()> {
  info!("Checking for SNAPSHOT versions in dependencies.");

  let violations = find_unreleased_dependencies(descriptors, loader, user_properties)?;
  if violations.is_empty() {
    return Ok(());
  }

  for violation in &violations {
    warn!("{}", violation);
  }
  Err(FlowError::Workflow(WorkflowError::UnreleasedDependencies { violations }))
}
