//! Workflow orchestration
//!
//! [`Workflow`] owns everything one run needs: the loaded configuration, the
//! git and Maven backends, the project loader and the mutable [`FlowContext`].
//! Branch switches go through it so the argument line always matches the
//! checked-out branch type.

use crate::build::maven::Maven;
use crate::build::pom::{PomLoader, ProjectLoader, Reactor};
use crate::build::snapshots;
use crate::core::config::FlowConfig;
use crate::core::context::FlowContext;
use crate::core::error::FlowResult;
use crate::core::validate;
use crate::core::vcs::SystemGit;
use crate::flow::branch_type::BranchType;
use crate::flow::propagate;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One workflow run over a project directory
pub struct Workflow {
  root: PathBuf,
  config: FlowConfig,
  git: SystemGit,
  maven: Maven,
  loader: Box<dyn ProjectLoader>,
  context: FlowContext,
}

impl Workflow {
  /// Load `gitflow.toml` from `root`, validate it and open the repository
  pub fn open(root: &Path) -> FlowResult<Self> {
    let config = FlowConfig::load(root)?;
    Self::with_config(root, config)
  }

  /// Start a run from an already loaded configuration
  pub fn with_config(root: &Path, config: FlowConfig) -> FlowResult<Self> {
    config.validate()?;
    let git = SystemGit::open(root, &config)?;
    let maven = Maven::new(root, &config.build, config.git.verbose);
    let context = FlowContext::new(config.build.arg_line.clone());
    debug!("Workflow opened at {}", root.display());

    Ok(Self {
      root: root.to_path_buf(),
      config,
      git,
      maven,
      loader: Box::new(PomLoader::new()),
      context,
    })
  }

  /// Replace the project descriptor loader
  pub fn with_loader(mut self, loader: Box<dyn ProjectLoader>) -> Self {
    self.loader = loader;
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn config(&self) -> &FlowConfig {
    &self.config
  }

  pub fn git(&self) -> &SystemGit {
    &self.git
  }

  pub fn maven(&self) -> &Maven {
    &self.maven
  }

  pub fn context(&self) -> &FlowContext {
    &self.context
  }

  /// Re-run the validation guard over the configuration and current argument line
  pub fn validate_configuration(&self) -> FlowResult<()> {
    self.config.validate()?;
    validate::validate_configuration::<&str>(self.context.arg_line(), &[])
  }

  /// Check out `branch`, then apply its branch-type configuration
  pub fn checkout_with_config(&mut self, branch_type: BranchType, branch: &str) -> FlowResult<()> {
    validate::validate(&[branch])?;
    self.git.checkout(branch)?;
    propagate::apply(&mut self.context, &self.config.changelist, branch_type);
    Ok(())
  }

  /// Create `new_branch` from `from_branch` and check it out, then apply its configuration
  pub fn create_and_checkout_with_config(
    &mut self,
    branch_type: BranchType,
    new_branch: &str,
    from_branch: &str,
  ) -> FlowResult<()> {
    validate::validate(&[new_branch, from_branch])?;
    self.git.create_and_checkout(new_branch, from_branch)?;
    propagate::apply(&mut self.context, &self.config.changelist, branch_type);
    Ok(())
  }

  pub fn check_uncommitted_changes(&self) -> FlowResult<()> {
    self.git.check_uncommitted_changes()
  }

  /// Fetch and compare `branch` with its remote, unless remote fetching is disabled
  pub fn check_remote_sync(&self, branch: &str) -> FlowResult<()> {
    if !self.config.git.fetch_remote {
      debug!("Remote fetching disabled, skipping sync check of '{}'", branch);
      return Ok(());
    }
    validate::validate(&[branch])?;
    self.git.fetch_and_compare(branch)
  }

  /// Reactor modules, discovered fresh from the root descriptor
  pub fn reactor(&self) -> FlowResult<Reactor> {
    Reactor::discover(&self.root, self.loader.as_ref(), self.context.user_properties())
  }

  /// Refuse to continue while any module depends on an unreleased external artifact,
  /// unless `[build].allow_snapshots` is set
  pub fn check_snapshot_dependencies(&self) -> FlowResult<()> {
    if self.config.build.allow_snapshots {
      warn!("SNAPSHOT dependency check skipped (allow_snapshots).");
      return Ok(());
    }
    let reactor = self.reactor()?;
    snapshots::check_no_unreleased_dependencies(
      reactor.descriptors(),
      self.loader.as_ref(),
      self.context.user_properties(),
    )
  }

  pub fn set_versions(&self, version: &str) -> FlowResult<()> {
    validate::validate(&[version])?;
    self.maven.set_versions(&self.context, self.loader.as_ref(), version)
  }

  pub fn current_project_version(&self) -> FlowResult<String> {
    self.maven.current_project_version(&self.context, self.loader.as_ref())
  }

  pub fn clean_test(&self) -> FlowResult<()> {
    self.maven.clean_test(&self.context)
  }

  pub fn clean_install(&self) -> FlowResult<()> {
    self.maven.clean_install(&self.context)
  }

  pub fn run_goals(&self, goals: &str) -> FlowResult<()> {
    validate::validate(&[goals])?;
    self.maven.run_goals(&self.context, goals)
  }
}
