//! Workflow role of a branch

use crate::core::config::GitFlowConfig;
use crate::core::error::{ConfigError, FlowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The workflow role of a branch, governing which configured values apply
/// while it is checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchType {
  Production,
  Hotfix,
  Release,
  Development,
  Feature,
  Support,
}

impl BranchType {
  pub const ALL: [BranchType; 6] = [
    BranchType::Production,
    BranchType::Hotfix,
    BranchType::Release,
    BranchType::Development,
    BranchType::Feature,
    BranchType::Support,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      BranchType::Production => "production",
      BranchType::Hotfix => "hotfix",
      BranchType::Release => "release",
      BranchType::Development => "development",
      BranchType::Feature => "feature",
      BranchType::Support => "support",
    }
  }

  /// Classify a branch name by the configured branch names and prefixes.
  ///
  /// Exact names win over prefixes; returns `None` for branches outside the model.
  pub fn classify(branch: &str, flow: &GitFlowConfig) -> Option<BranchType> {
    if branch == flow.production_branch {
      return Some(BranchType::Production);
    }
    if branch == flow.development_branch {
      return Some(BranchType::Development);
    }

    let prefixed = [
      (flow.feature_prefix.as_str(), BranchType::Feature),
      (flow.release_prefix.as_str(), BranchType::Release),
      (flow.hotfix_prefix.as_str(), BranchType::Hotfix),
      (flow.support_prefix.as_str(), BranchType::Support),
    ];
    prefixed
      .into_iter()
      .find(|(prefix, _)| !prefix.is_empty() && branch.starts_with(prefix))
      .map(|(_, kind)| kind)
  }
}

impl fmt::Display for BranchType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BranchType {
  type Err = FlowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lowered = s.trim().to_ascii_lowercase();
    BranchType::ALL
      .into_iter()
      .find(|t| t.as_str() == lowered)
      .ok_or_else(|| FlowError::Config(ConfigError::UnknownBranchType { value: s.to_string() }))
  }
}
