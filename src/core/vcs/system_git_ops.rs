//! Git operations catalog for SystemGit (branches, merges, tags, remotes)

use super::message::{MessageProperties, replace_properties, with_prefix};
use super::system_git::SystemGit;
use crate::core::error::{CommandError, FlowError, FlowResult, WorkflowError};
use crate::core::exec::CommandResult;
use crate::core::validate::is_blank;
use tracing::{info, warn};

/// Merge strategy flags as requested by a workflow step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
  pub rebase: bool,
  pub no_fast_forward: bool,
  pub fast_forward_only: bool,
}

/// The one strategy a merge actually runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
  Rebase,
  FastForwardOnly,
  NoFastForward,
  Merge,
}

impl MergeOptions {
  /// Priority: rebase > fast-forward-only > no-fast-forward > plain merge
  pub fn strategy(self) -> MergeStrategy {
    if self.rebase {
      MergeStrategy::Rebase
    } else if self.fast_forward_only {
      MergeStrategy::FastForwardOnly
    } else if self.no_fast_forward {
      MergeStrategy::NoFastForward
    } else {
      MergeStrategy::Merge
    }
  }
}

impl MergeStrategy {
  /// Whether this strategy creates a merge commit that can carry a message
  pub fn takes_message(self) -> bool {
    matches!(self, MergeStrategy::NoFastForward | MergeStrategy::Merge)
  }

  /// Git arguments for this strategy. An empty `sign` flag is left out.
  pub fn args<'a>(self, sign: &'a str, branch: &'a str, message: Option<&'a str>) -> Vec<&'a str> {
    let message = message.filter(|_| self.takes_message());
    let mut args = match self {
      MergeStrategy::Rebase => vec!["rebase", sign, branch],
      MergeStrategy::FastForwardOnly => vec!["merge", "--ff-only", sign, branch],
      MergeStrategy::NoFastForward => vec!["merge", "--no-ff", sign, branch],
      MergeStrategy::Merge => vec!["merge", sign, branch],
    };
    args.retain(|a| !a.is_empty());
    if let Some(msg) = message {
      args.extend(["-m", msg]);
    }
    args
  }
}

impl SystemGit {
  /// Current branch name (`symbolic-ref -q --short HEAD`)
  pub fn current_branch(&self) -> FlowResult<String> {
    Ok(self.run(&["symbolic-ref", "-q", "--short", "HEAD"])?.trim().to_string())
  }

  /// Whether git accepts `name` as a one-level-or-deeper ref name
  pub fn is_valid_branch_name(&self, name: &str) -> FlowResult<bool> {
    Ok(self.probe(&["check-ref-format", "--allow-onelevel", name])?.success())
  }

  /// Whether the working tree or index differs from HEAD.
  ///
  /// `diff --exit-code` and `diff-index --quiet` exit 1 when differences exist;
  /// any other failure with diagnostic output is a git error.
  pub fn has_uncommitted_changes(&self) -> FlowResult<bool> {
    let diff = self.probe(&["diff", "--no-ext-diff", "--ignore-submodules", "--quiet", "--exit-code"])?;
    let failed = if diff.success() {
      let index = self.probe(&["diff-index", "--cached", "--quiet", "--ignore-submodules", "HEAD", "--"])?;
      if index.success() {
        return Ok(false);
      }
      index
    } else {
      diff
    };

    differences_found(failed)
  }

  /// Refuse to continue on a dirty working tree
  pub fn check_uncommitted_changes(&self) -> FlowResult<()> {
    info!("Checking for uncommitted changes.");
    if self.has_uncommitted_changes()? {
      return Err(FlowError::Workflow(WorkflowError::UncommittedChanges));
    }
    Ok(())
  }

  /// Cache the branching model in the repository's `gitflow.*` config namespace
  pub fn init_config(&self) -> FlowResult<()> {
    let flow = self.flow.clone();
    self.set_config("gitflow.branch.master", &flow.production_branch)?;
    self.set_config("gitflow.branch.develop", &flow.development_branch)?;
    self.set_config("gitflow.prefix.feature", &flow.feature_prefix)?;
    self.set_config("gitflow.prefix.release", &flow.release_prefix)?;
    self.set_config("gitflow.prefix.hotfix", &flow.hotfix_prefix)?;
    self.set_config("gitflow.prefix.support", &flow.support_prefix)?;
    self.set_config("gitflow.prefix.versiontag", &flow.version_tag_prefix)?;
    self.set_config("gitflow.origin", &flow.origin)?;
    Ok(())
  }

  fn set_config(&self, name: &str, value: &str) -> FlowResult<()> {
    let value = if value.is_empty() { "\"\"" } else { value };
    // exit code ignored
    self.probe(&["config", name, value])?;
    Ok(())
  }

  /// Local branches matching `pattern` (`refs/heads/`)
  pub fn find_branches(&self, pattern: &str, first_match: bool) -> FlowResult<String> {
    self.find_branches_in("refs/heads/", pattern, first_match)
  }

  /// Branch names under `refs` matching `pattern` as a prefix.
  ///
  /// A pattern ending in `/` matches recursively (`**`), otherwise one segment (`*`).
  pub fn find_branches_in(&self, refs: &str, pattern: &str, first_match: bool) -> FlowResult<String> {
    let wildcard = if pattern.ends_with('/') { "**" } else { "*" };
    let target = format!("{}{}{}", refs, pattern, wildcard);

    let out = if first_match {
      self.run(&["for-each-ref", "--count=1", "--format=\"%(refname:short)\"", &target])?
    } else {
      self.run(&["for-each-ref", "--format=\"%(refname:short)\"", &target])?
    };

    Ok(remove_quotes(&out).trim().to_string())
  }

  /// All tags, oldest author date first
  pub fn find_tags(&self) -> FlowResult<String> {
    let out = self.run(&["for-each-ref", "--sort=*authordate", "--format=\"%(refname:short)\"", "refs/tags/"])?;
    Ok(remove_quotes(&out))
  }

  /// Highest tag by version order, newest tagger date breaking ties
  pub fn find_last_tag(&self) -> FlowResult<String> {
    let out = self.run(&[
      "for-each-ref",
      "--sort=-version:refname",
      "--sort=-taggerdate",
      "--count=1",
      "--format=\"%(refname:short)\"",
      "refs/tags/",
    ])?;
    Ok(remove_quotes(&out).replace("\r\n", "").replace('\n', ""))
  }

  /// Whether `refs/heads/<branch>` exists
  pub fn branch_exists(&self, branch: &str) -> FlowResult<bool> {
    let r = format!("refs/heads/{}", branch);
    Ok(self.probe(&["show-ref", "--verify", "--quiet", &r])?.success())
  }

  /// Whether `refs/tags/<tag>` exists
  pub fn tag_exists(&self, tag: &str) -> FlowResult<bool> {
    let r = format!("refs/tags/{}", tag);
    Ok(self.probe(&["show-ref", "--verify", "--quiet", &r])?.success())
  }

  pub fn checkout(&self, branch: &str) -> FlowResult<()> {
    info!("Checking out '{}' branch.", branch);
    self.run(&["checkout", branch])?;
    Ok(())
  }

  pub fn create_and_checkout(&self, new_branch: &str, from_branch: &str) -> FlowResult<()> {
    info!(
      "Creating a new branch '{}' from '{}' and checking it out.",
      new_branch, from_branch
    );
    self.run(&["checkout", "-b", new_branch, from_branch])?;
    Ok(())
  }

  pub fn create_branch(&self, new_branch: &str, from_branch: &str) -> FlowResult<()> {
    info!("Creating a new branch '{}' from '{}'.", new_branch, from_branch);
    self.run(&["branch", new_branch, from_branch])?;
    Ok(())
  }

  /// `commit -a [-S] -m`, with prefix and placeholders applied to the message
  pub fn commit(&self, message: &str, properties: &MessageProperties) -> FlowResult<()> {
    let message = with_prefix(message, self.settings.commit_message_prefix.as_deref());
    let message = replace_properties(&message, properties);

    if self.settings.gpg_sign_commit {
      info!("Committing changes. GPG-signed.");
      self.run(&["commit", "-a", "-S", "-m", &message])?;
    } else {
      info!("Committing changes.");
      self.run(&["commit", "-a", "-m", &message])?;
    }
    Ok(())
  }

  /// Rebase or merge `branch` into the current branch.
  ///
  /// A non-blank message is only used by strategies that create a merge commit.
  pub fn merge(
    &self,
    branch: &str,
    options: MergeOptions,
    message: Option<&str>,
    properties: &MessageProperties,
  ) -> FlowResult<()> {
    let message = message.filter(|m| !is_blank(m)).map(|m| {
      let prefixed = with_prefix(m, self.settings.commit_message_prefix.as_deref());
      replace_properties(&prefixed, properties)
    });

    let strategy = options.strategy();
    match strategy {
      MergeStrategy::Rebase => info!("Rebasing '{}' branch.", branch),
      MergeStrategy::FastForwardOnly => info!("Merging (--ff-only) '{}' branch.", branch),
      MergeStrategy::NoFastForward => info!("Merging (--no-ff) '{}' branch.", branch),
      MergeStrategy::Merge => info!("Merging '{}' branch.", branch),
    }

    self.run(&strategy.args(self.sign_flag(), branch, message.as_deref()))?;
    Ok(())
  }

  pub fn merge_no_ff(&self, branch: &str, message: Option<&str>, properties: &MessageProperties) -> FlowResult<()> {
    let options = MergeOptions {
      no_fast_forward: true,
      ..Default::default()
    };
    self.merge(branch, options, message, properties)
  }

  pub fn merge_squash(&self, branch: &str) -> FlowResult<()> {
    info!("Squashing '{}' branch.", branch);
    self.run(&["merge", "--squash", branch])?;
    Ok(())
  }

  /// Annotated tag, optionally GPG-signed
  pub fn tag(&self, name: &str, message: &str, signed: bool, properties: &MessageProperties) -> FlowResult<()> {
    let message = replace_properties(message, properties);

    if signed {
      info!("Creating GPG-signed '{}' tag.", name);
      self.run(&["tag", "-a", "-s", name, "-m", &message])?;
    } else {
      info!("Creating '{}' tag.", name);
      self.run(&["tag", "-a", name, "-m", &message])?;
    }
    Ok(())
  }

  /// `branch -d`, or `branch -D` when forced
  pub fn branch_delete(&self, branch: &str, force: bool) -> FlowResult<()> {
    if force {
      info!("Deleting (-D) '{}' branch.", branch);
      self.run(&["branch", "-D", branch])?;
    } else {
      info!("Deleting '{}' branch.", branch);
      self.run(&["branch", "-d", branch])?;
    }
    Ok(())
  }

  /// Fetch `branch` (or everything when empty) from the remote.
  ///
  /// Returns whether the fetch succeeded; failure is only a warning.
  pub fn fetch_remote(&self, branch: &str) -> FlowResult<bool> {
    let origin = &self.flow.origin;
    info!("Fetching remote branch '{} {}'.", origin, branch);

    let mut args = vec!["fetch", "--quiet", origin.as_str()];
    if !branch.is_empty() {
      args.push(branch);
    }
    let result = self.probe(&args)?;
    if !result.success() {
      warn!(
        "There were some problems fetching remote branch '{} {}'. You can turn off remote branch fetching by setting the 'fetch_remote' parameter to false.",
        origin, branch
      );
    }
    Ok(result.success())
  }

  /// Fetch `branch` and fail if the remote has commits the local branch lacks
  pub fn fetch_and_compare(&self, branch: &str) -> FlowResult<()> {
    if !self.fetch_remote(branch)? {
      return Ok(());
    }

    let origin = &self.flow.origin;
    info!(
      "Comparing local branch '{}' with remote '{}/{}'.",
      branch, origin, branch
    );
    let range = format!("{}...{}/{}", branch, origin, branch);
    let out = self.run(&["rev-list", "--left-right", "--count", &range])?;

    if let Some(behind) = remote_ahead_count(&out)
      && behind != "0"
    {
      return Err(FlowError::Workflow(WorkflowError::Diverged {
        remote: origin.clone(),
        branch: branch.to_string(),
      }));
    }
    Ok(())
  }

  /// Create the local branch from the remote one if it does not exist yet
  pub fn fetch_remote_and_create(&self, branch: &str) -> FlowResult<()> {
    if self.branch_exists(branch)? {
      return Ok(());
    }

    let origin = self.flow.origin.clone();
    info!(
      "Local branch '{}' doesn't exist. Trying to fetch and check it out from '{}'.",
      branch, origin
    );
    self.fetch_remote(branch)?;
    self.create_and_checkout(branch, &format!("{}/{}", origin, branch))
  }

  /// Fetch everything, then search `refs/remotes/<remote>/`
  pub fn fetch_and_find_remote_branches(&self, remote: &str, pattern: &str, first_match: bool) -> FlowResult<String> {
    self.fetch_remote("")?;
    self.find_branches_in(&format!("refs/remotes/{}/", remote), pattern, first_match)
  }

  /// `push --quiet -u [--follow-tags] <origin> <branch>`
  pub fn push(&self, branch: &str, follow_tags: bool) -> FlowResult<()> {
    let origin = &self.flow.origin;
    info!("Pushing '{}' branch to '{}'.", branch, origin);

    if follow_tags {
      self.run(&["push", "--quiet", "-u", "--follow-tags", origin, branch])?;
    } else {
      self.run(&["push", "--quiet", "-u", origin, branch])?;
    }
    Ok(())
  }

  /// Delete the remote branch; failure is only a warning
  pub fn push_delete(&self, branch: &str) -> FlowResult<()> {
    let origin = &self.flow.origin;
    info!("Deleting remote branch '{}' from '{}'.", branch, origin);

    let result = self.probe(&["push", "--delete", origin, branch])?;
    if !result.success() {
      warn!(
        "There were some problems deleting remote branch '{}' from '{}'.",
        branch, origin
      );
    }
    Ok(())
  }
}

/// Judge a diff probe that did not exit cleanly.
///
/// Exit code 1 means differences; any other exit with diagnostic output is a git error.
fn differences_found(failed: CommandResult) -> FlowResult<bool> {
  if failed.exit_code != 1 && !is_blank(&failed.stderr) {
    return Err(FlowError::Command(CommandError::Failed {
      command: "git diff".to_string(),
      exit_code: failed.exit_code,
      output: failed.stderr,
    }));
  }
  Ok(true)
}

/// `for-each-ref` output may come back quote-wrapped
fn remove_quotes(s: &str) -> String {
  s.replace('"', "")
}

/// Right-hand count of `rev-list --left-right --count` output, whitespace removed
fn remote_ahead_count(out: &str) -> Option<String> {
  let mut counts = out.split('\t').filter(|s| !s.is_empty());
  let _local = counts.next()?;
  counts.next().map(|c| c.chars().filter(|ch| !ch.is_whitespace()).collect())
}
