use crate::core::error::{ConfigError, FlowError, FlowResult, ResultExt};
use crate::core::validate;
use crate::flow::BranchType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for gitflow-mvn
/// Searched in order: gitflow.toml, .gitflow.toml, .config/gitflow.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
  #[serde(default)]
  pub flow: GitFlowConfig,
  #[serde(default)]
  pub git: GitConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub changelist: ChangelistConfig,
}

/// Branch names and prefixes of the branching model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitFlowConfig {
  pub production_branch: String,
  pub development_branch: String,
  pub feature_prefix: String,
  pub release_prefix: String,
  pub hotfix_prefix: String,
  pub support_prefix: String,
  pub version_tag_prefix: String,
  pub origin: String,
}

impl Default for GitFlowConfig {
  fn default() -> Self {
    Self {
      production_branch: "master".to_string(),
      development_branch: "develop".to_string(),
      feature_prefix: "feature/".to_string(),
      release_prefix: "release/".to_string(),
      hotfix_prefix: "hotfix/".to_string(),
      support_prefix: "support/".to_string(),
      version_tag_prefix: String::new(),
      origin: "origin".to_string(),
    }
  }
}

impl GitFlowConfig {
  /// Whether production and development are separate branches
  pub fn not_same_prod_dev_name(&self) -> bool {
    self.production_branch != self.development_branch
  }
}

/// Settings for the git executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
  /// Path to git (default: "git")
  #[serde(skip_serializing_if = "Option::is_none")]
  pub executable: Option<String>,

  /// Pass -S to commits, merges and rebases
  pub gpg_sign_commit: bool,

  /// Prepended to every commit and merge message
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_message_prefix: Option<String>,

  /// Fetch and compare remote branches before operating on them
  pub fetch_remote: bool,

  /// Echo command output
  pub verbose: bool,
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      executable: None,
      gpg_sign_commit: false,
      commit_message_prefix: None,
      fetch_remote: true,
      verbose: false,
    }
  }
}

/// Settings for the mvn executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Path to mvn (default: ./mvnw when present, else "mvn")
  #[serde(skip_serializing_if = "Option::is_none")]
  pub executable: Option<String>,

  /// Free-form arguments appended to every mvn invocation
  #[serde(skip_serializing_if = "Option::is_none")]
  pub arg_line: Option<String>,

  /// Use tycho-versions-plugin instead of versions-maven-plugin
  pub tycho_build: bool,

  /// Pass -DgroupId= -DartifactId= to versions:set
  pub versions_force_update: bool,

  /// Property to set alongside (or instead of) the version
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version_property: Option<String>,

  /// Only update `version_property`, leave `<version>` alone
  pub skip_update_version: bool,

  /// Refresh project.build.outputTimestamp after a version change
  pub update_output_timestamp: bool,

  /// Skip the SNAPSHOT dependency check
  pub allow_snapshots: bool,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      executable: None,
      arg_line: None,
      tycho_build: false,
      versions_force_update: false,
      version_property: None,
      skip_update_version: false,
      update_output_timestamp: true,
      allow_snapshots: false,
    }
  }
}

/// Per-branch-type values for a CI-friendly version property
///
/// ```toml
/// [changelist]
/// property = "changelist"
///
/// [changelist.values]
/// production = ""
/// feature = "-SNAPSHOT"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelistConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub property: Option<String>,
  pub values: ChangelistValues,
}

impl Default for ChangelistConfig {
  fn default() -> Self {
    Self {
      property: Some("changelist".to_string()),
      values: ChangelistValues::default(),
    }
  }
}

impl ChangelistConfig {
  /// Configured value for a branch type; `None` removes the property
  pub fn value_for(&self, branch_type: BranchType) -> Option<&str> {
    self.values.get(branch_type)
  }

  /// Whether the property is named and at least one branch type has a value
  pub fn is_enabled(&self) -> bool {
    self.property.as_deref().is_some_and(|p| !validate::is_blank(p)) && !self.values.is_empty()
  }
}

/// One optional value per branch type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelistValues {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub production: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hotfix: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub release: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub development: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub feature: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub support: Option<String>,
}

impl ChangelistValues {
  fn slot(&self, branch_type: BranchType) -> &Option<String> {
    match branch_type {
      BranchType::Production => &self.production,
      BranchType::Hotfix => &self.hotfix,
      BranchType::Release => &self.release,
      BranchType::Development => &self.development,
      BranchType::Feature => &self.feature,
      BranchType::Support => &self.support,
    }
  }

  pub fn get(&self, branch_type: BranchType) -> Option<&str> {
    self.slot(branch_type).as_deref()
  }

  pub fn set(&mut self, branch_type: BranchType, value: Option<String>) {
    let slot = match branch_type {
      BranchType::Production => &mut self.production,
      BranchType::Hotfix => &mut self.hotfix,
      BranchType::Release => &mut self.release,
      BranchType::Development => &mut self.development,
      BranchType::Feature => &mut self.feature,
      BranchType::Support => &mut self.support,
    };
    *slot = value;
  }

  /// Configured values in branch-type order
  pub fn iter(&self) -> impl Iterator<Item = (BranchType, &str)> {
    BranchType::ALL.into_iter().filter_map(|t| self.get(t).map(|v| (t, v)))
  }

  pub fn is_empty(&self) -> bool {
    self.iter().next().is_none()
  }
}

impl FlowConfig {
  /// Find config file in search order: gitflow.toml, .gitflow.toml, .config/gitflow.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("gitflow.toml"),
      path.join(".gitflow.toml"),
      path.join(".config").join("gitflow.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> FlowResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: FlowConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Save config to gitflow.toml (default location)
  pub fn save(&self, path: &Path) -> FlowResult<()> {
    let config_path = path.join("gitflow.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Run every configured value that reaches a command line through the validation guard
  pub fn validate(&self) -> FlowResult<()> {
    let flow = &self.flow;
    if validate::is_blank(&flow.production_branch) || validate::is_blank(&flow.development_branch) {
      return Err(FlowError::Config(ConfigError::Invalid {
        message: "Production and development branch names must not be blank".to_string(),
      }));
    }

    let mut values: Vec<&str> = vec![
      &flow.production_branch,
      &flow.development_branch,
      &flow.feature_prefix,
      &flow.release_prefix,
      &flow.hotfix_prefix,
      &flow.support_prefix,
      &flow.version_tag_prefix,
      &flow.origin,
    ];
    values.extend(self.build.version_property.as_deref());
    values.extend(self.changelist.property.as_deref());
    values.extend(self.changelist.values.iter().map(|(_, v)| v));

    validate::validate_configuration(self.build.arg_line.as_deref(), &values)
  }
}
