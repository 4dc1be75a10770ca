//! Git operations against real repositories

use crate::helpers::*;
use anyhow::Result;
use gitflow_mvn::core::config::FlowConfig;
use gitflow_mvn::core::error::{CommandError, FlowError, WorkflowError};
use gitflow_mvn::core::vcs::{MergeOptions, MessageProperties};

fn props(pairs: &[(&str, &str)]) -> MessageProperties {
  pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_open_outside_repository_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let result = gitflow_mvn::core::vcs::SystemGit::open(dir.path(), &FlowConfig::default());
  assert!(result.is_err());
  Ok(())
}

#[test]
fn test_uncommitted_changes_detection() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;
  assert!(!git.has_uncommitted_changes()?);
  git.check_uncommitted_changes()?;

  // untracked files are not uncommitted changes
  repo.write_file("notes.txt", "scratch")?;
  assert!(!git.has_uncommitted_changes()?);

  // staged only
  git_stdout(&repo.path, &["add", "notes.txt"])?;
  assert!(git.has_uncommitted_changes()?);
  repo.commit("Add notes")?;
  assert!(!git.has_uncommitted_changes()?);

  // working tree only
  repo.write_file("pom.xml", "<project/>")?;
  assert!(git.has_uncommitted_changes()?);
  let err = git.check_uncommitted_changes().unwrap_err();
  assert!(matches!(err, FlowError::Workflow(WorkflowError::UncommittedChanges)));
  Ok(())
}

#[test]
fn test_uncommitted_changes_error_without_head() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  git(dir.path(), &["init", "--initial-branch=master"])?;
  let git = gitflow_mvn::core::vcs::SystemGit::open(dir.path(), &FlowConfig::default())?;

  match git.has_uncommitted_changes() {
    Err(FlowError::Command(CommandError::Failed { exit_code, output, .. })) => {
      assert_eq!(exit_code, 128);
      assert!(output.contains("HEAD"));
    }
    other => panic!("unexpected result: {:?}", other.map_err(|e| e.to_string())),
  }
  Ok(())
}

#[test]
fn test_branch_queries() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  assert_eq!(git.current_branch()?, "master");
  assert!(git.branch_exists("master")?);
  assert!(!git.branch_exists("develop")?);
  assert!(git.is_valid_branch_name("feature/login")?);
  assert!(git.is_valid_branch_name("develop")?);
  assert!(!git.is_valid_branch_name("bad..name")?);
  assert!(!git.is_valid_branch_name("ends-with.lock")?);
  Ok(())
}

#[test]
fn test_find_branches_recursive_prefix() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.branch("feature/a")?;
  repo.branch("feature/b/nested")?;
  repo.branch("release/1.0")?;
  let git = repo.git()?;

  let all = git.find_branches("feature/", false)?;
  let names: Vec<&str> = all.lines().collect();
  assert_eq!(names, vec!["feature/a", "feature/b/nested"]);
  assert!(!all.contains('"'));

  let first = git.find_branches("feature/", true)?;
  assert_eq!(first, "feature/a");

  assert_eq!(git.find_branches("hotfix/", false)?, "");
  Ok(())
}

#[test]
fn test_find_last_tag_picks_highest_version() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.annotated_tag("v1.0")?;
  repo.commit_file("a.txt", "a", "a")?;
  repo.annotated_tag("v1.1")?;
  repo.commit_file("b.txt", "b", "b")?;
  repo.annotated_tag("v2.0")?;
  let git = repo.git()?;

  assert_eq!(git.find_last_tag()?, "v2.0");

  let tags = git.find_tags()?;
  assert_eq!(tags.lines().collect::<Vec<_>>(), vec!["v1.0", "v1.1", "v2.0"]);

  assert!(git.tag_exists("v1.1")?);
  assert!(!git.tag_exists("v3.0")?);
  Ok(())
}

#[test]
fn test_create_checkout_and_delete() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  git.create_branch("develop", "master")?;
  assert!(git.branch_exists("develop")?);
  assert_eq!(git.current_branch()?, "master");

  git.create_and_checkout("feature/x", "develop")?;
  assert_eq!(git.current_branch()?, "feature/x");

  git.checkout("develop")?;
  assert_eq!(git.current_branch()?, "develop");

  git.branch_delete("feature/x", false)?;
  assert!(!git.branch_exists("feature/x")?);

  // unmerged work needs force
  git.create_and_checkout("feature/y", "develop")?;
  repo.commit_file("y.txt", "y", "y work")?;
  git.checkout("develop")?;
  assert!(git.branch_delete("feature/y", false).is_err());
  git.branch_delete("feature/y", true)?;
  assert!(!git.branch_exists("feature/y")?);
  Ok(())
}

#[test]
fn test_checkout_missing_branch_reports_git_stderr() -> Result<()> {
  let repo = TestRepo::new()?;
  let err = repo.git()?.checkout("does-not-exist").unwrap_err();
  assert!(matches!(err, FlowError::Command(_)));
  assert!(err.to_string().contains("does-not-exist"));
  Ok(())
}

#[test]
fn test_commit_applies_prefix_and_placeholders() -> Result<()> {
  let repo = TestRepo::new()?;
  let mut config = FlowConfig::default();
  config.git.commit_message_prefix = Some("[flow] ".to_string());
  let git = repo.git_with(&config)?;

  repo.write_file("pom.xml", "<project><version>1.2.3</version></project>")?;
  git.commit("Update versions for release @{version} @{unknown}", &props(&[("version", "1.2.3")]))?;

  assert_eq!(repo.subject("HEAD")?, "[flow] Update versions for release 1.2.3 @{unknown}");
  assert!(!git.has_uncommitted_changes()?);
  Ok(())
}

#[test]
fn test_merge_no_ff_with_message() -> Result<()> {
  let repo = TestRepo::new()?;
  let mut config = FlowConfig::default();
  config.git.commit_message_prefix = Some("[flow] ".to_string());
  let git = repo.git_with(&config)?;

  git.create_and_checkout("feature/x", "master")?;
  repo.commit_file("x.txt", "x", "feature work")?;
  git.checkout("master")?;

  git.merge_no_ff("feature/x", Some("Merge @{branch}"), &props(&[("branch", "feature/x")]))?;

  assert_eq!(repo.subject("HEAD")?, "[flow] Merge feature/x");
  assert_eq!(repo.parent_count("HEAD")?, 2);
  Ok(())
}

#[test]
fn test_fast_forward_only_ignores_message() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  git.create_and_checkout("feature/x", "master")?;
  repo.commit_file("x.txt", "x", "feature work")?;
  git.checkout("master")?;

  let options = MergeOptions {
    fast_forward_only: true,
    no_fast_forward: true,
    ..Default::default()
  };
  git.merge("feature/x", options, Some("never used"), &MessageProperties::new())?;

  assert_eq!(repo.subject("HEAD")?, "feature work");
  assert_eq!(repo.parent_count("HEAD")?, 1);
  Ok(())
}

#[test]
fn test_rebase_replays_current_branch() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  git.create_branch("feature/x", "master")?;
  repo.commit_file("m.txt", "m", "master work")?;
  git.checkout("feature/x")?;
  repo.commit_file("x.txt", "x", "feature work")?;

  let options = MergeOptions {
    rebase: true,
    ..Default::default()
  };
  git.merge("master", options, Some("ignored"), &MessageProperties::new())?;

  assert_eq!(repo.subject("HEAD")?, "feature work");
  assert_eq!(repo.subject("HEAD~1")?, "master work");
  Ok(())
}

#[test]
fn test_merge_squash_stages_changes() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  git.create_and_checkout("feature/x", "master")?;
  repo.commit_file("x.txt", "x", "feature work")?;
  git.checkout("master")?;

  git.merge_squash("feature/x")?;
  assert!(git.has_uncommitted_changes()?);
  Ok(())
}

#[test]
fn test_annotated_tag_with_empty_message() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = repo.git()?;

  git.tag("v0.9", "", false, &MessageProperties::new())?;

  assert!(git.tag_exists("v0.9")?);
  let message = git_stdout(&repo.path, &["for-each-ref", "--format=%(contents)", "refs/tags/v0.9"])?;
  assert_eq!(message, "");
  Ok(())
}

#[test]
fn test_annotated_tag_message_placeholders() -> Result<()> {
  let repo = TestRepo::new()?;
  let mut config = FlowConfig::default();
  config.git.commit_message_prefix = Some("[flow] ".to_string());
  let git = repo.git_with(&config)?;

  git.tag("v1.0", "Tag release @{version}", false, &props(&[("version", "1.0")]))?;

  assert!(git.tag_exists("v1.0")?);
  let message = git_stdout(&repo.path, &["for-each-ref", "--format=%(contents:subject)", "refs/tags/v1.0"])?;
  assert_eq!(message, "Tag release 1.0");
  Ok(())
}

#[test]
fn test_init_config_writes_gitflow_namespace() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.git()?.init_config()?;

  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.branch.master"])?, "master");
  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.branch.develop"])?, "develop");
  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.prefix.feature"])?, "feature/");
  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.prefix.versiontag"])?, "\"\"");
  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.origin"])?, "origin");
  Ok(())
}
