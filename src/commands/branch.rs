//! Branch commands

use std::path::Path;

use crate::core::error::{ConfigError, FlowError, FlowResult};
use crate::core::validate::validate;
use crate::flow::{BranchType, Workflow};

/// Check out a branch and apply its branch-type configuration.
///
/// Without an explicit type the branch is classified by the configured names and prefixes.
pub fn run_checkout(root: &Path, branch: &str, branch_type: Option<BranchType>) -> FlowResult<()> {
  let mut workflow = Workflow::open(root)?;
  let branch_type = match branch_type {
    Some(t) => t,
    None => BranchType::classify(branch, &workflow.config().flow).ok_or_else(|| {
      FlowError::Config(ConfigError::Invalid {
        message: format!("Cannot determine the branch type of '{}'. Pass --type explicitly.", branch),
      })
    })?,
  };

  workflow.checkout_with_config(branch_type, branch)?;
  print_arg_line(&workflow);
  Ok(())
}

pub fn run_create(root: &Path, new_branch: &str, from_branch: &str, branch_type: BranchType) -> FlowResult<()> {
  let mut workflow = Workflow::open(root)?;
  if !workflow.git().is_valid_branch_name(new_branch)? {
    return Err(FlowError::Config(ConfigError::Invalid {
      message: format!("The name of the branch is not valid: '{}'", new_branch),
    }));
  }
  if workflow.git().branch_exists(new_branch)? {
    return Err(FlowError::Config(ConfigError::Invalid {
      message: format!("Branch '{}' already exists.", new_branch),
    }));
  }

  workflow.create_and_checkout_with_config(branch_type, new_branch, from_branch)?;
  print_arg_line(&workflow);
  Ok(())
}

fn print_arg_line(workflow: &Workflow) {
  if let Some(line) = workflow.context().arg_line() {
    println!("argLine: {}", line);
  }
}

/// List local branches, or branches of a remote after fetching it
pub fn run_branches(root: &Path, pattern: &str, remote: Option<&str>, first: bool) -> FlowResult<()> {
  validate(&[pattern])?;
  let workflow = Workflow::open(root)?;
  let found = match remote {
    Some(remote) => {
      validate(&[remote])?;
      workflow.git().fetch_and_find_remote_branches(remote, pattern, first)?
    }
    None => workflow.git().find_branches(pattern, first)?,
  };

  if !found.is_empty() {
    println!("{}", found);
  }
  Ok(())
}

pub fn run_tags(root: &Path, last: bool) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  let tags = if last {
    workflow.git().find_last_tag()?
  } else {
    workflow.git().find_tags()?
  };

  let tags = tags.trim_end();
  if !tags.is_empty() {
    println!("{}", tags);
  }
  Ok(())
}

pub fn run_check_clean(root: &Path) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  workflow.check_uncommitted_changes()?;
  println!("✅ Working tree clean");
  Ok(())
}

/// Fetch `branch` and fail when the remote is ahead
pub fn run_sync_check(root: &Path, branch: &str) -> FlowResult<()> {
  let workflow = Workflow::open(root)?;
  workflow.check_remote_sync(branch)?;
  println!("✅ '{}' is not behind '{}'", branch, workflow.config().flow.origin);
  Ok(())
}
