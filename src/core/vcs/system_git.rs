//! System git backend
//!
//! Every operation is one `git` subprocess run through the [`Executor`]:
//! - checked runs for commands whose failure aborts the workflow
//! - probes for existence checks and syntax checks, where a non-zero exit is an answer

use crate::core::config::{FlowConfig, GitConfig, GitFlowConfig};
use crate::core::error::{FlowError, FlowResult};
use crate::core::exec::{CommandResult, Executor};
use std::path::{Path, PathBuf};

/// Git backend driving the system `git` executable
pub struct SystemGit {
  pub(crate) exec: Executor,

  /// Branch names, prefixes and remote name
  pub(crate) flow: GitFlowConfig,

  /// Signing and message settings
  pub(crate) settings: GitConfig,
}

impl SystemGit {
  /// Create a backend for the repository at `path` without touching git
  pub fn new(path: &Path, config: &FlowConfig) -> Self {
    Self {
      exec: Executor::git(path, config.git.executable.clone(), config.git.verbose),
      flow: config.flow.clone(),
      settings: config.git.clone(),
    }
  }

  /// Open a git repository, verifying that `path` lies inside a working tree
  pub fn open(path: &Path, config: &FlowConfig) -> FlowResult<Self> {
    let git = Self::new(path, config);
    let result = git.probe(&["rev-parse", "--show-toplevel"])?;
    if !result.success() {
      return Err(FlowError::with_help(
        format!("Git repository not found at: {}", path.display()),
        "Run the command inside a git working tree or initialize one with `git init`.",
      ));
    }
    Ok(git)
  }

  /// Working tree root as reported by git
  pub fn work_tree(&self) -> FlowResult<PathBuf> {
    let out = self.run(&["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(out.trim()))
  }

  pub fn flow(&self) -> &GitFlowConfig {
    &self.flow
  }

  /// Run a git command that must succeed, returning its stdout
  pub(crate) fn run(&self, args: &[&str]) -> FlowResult<String> {
    Ok(self.exec.run_checked(args, None)?.stdout)
  }

  /// Run a git command whose exit code is a meaningful answer
  pub(crate) fn probe(&self, args: &[&str]) -> FlowResult<CommandResult> {
    self.exec.run_probe(args)
  }

  /// `-S` when commits are GPG-signed, otherwise nothing
  pub(crate) fn sign_flag(&self) -> &'static str {
    if self.settings.gpg_sign_commit { "-S" } else { "" }
  }
}
