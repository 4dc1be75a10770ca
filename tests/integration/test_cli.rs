//! End-to-end runs of the gitflow-mvn binary

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_writes_config_and_git_cache() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_gitflow(&repo.path, &["init"])?;
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

  let config = repo.read_file("gitflow.toml")?;
  assert!(config.contains("[flow]"));
  assert!(config.contains("production_branch = \"master\""));
  assert_eq!(git_stdout(&repo.path, &["config", "gitflow.branch.develop"])?, "develop");
  Ok(())
}

#[test]
fn test_checkout_classifies_branch_type() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit_file(
    "gitflow.toml",
    "[changelist.values]\nfeature = \"-SNAPSHOT\"\n",
    "Add gitflow config",
  )?;
  repo.branch("feature/x")?;

  let output = run_gitflow(&repo.path, &["checkout", "feature/x"])?;
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  assert!(String::from_utf8_lossy(&output.stdout).contains("-Dchangelist=-SNAPSHOT"));
  assert_eq!(git_stdout(&repo.path, &["symbolic-ref", "--short", "HEAD"])?, "feature/x");
  Ok(())
}

#[test]
fn test_checkout_unknown_branch_type_needs_flag() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.branch("experiment")?;

  let output = run_gitflow(&repo.path, &["checkout", "experiment"])?;
  assert_eq!(output.status.code(), Some(1));

  let output = run_gitflow(&repo.path, &["checkout", "experiment", "--type", "feature"])?;
  assert!(output.status.success());
  Ok(())
}

#[test]
fn test_check_clean_exit_codes() -> Result<()> {
  let repo = TestRepo::new()?;
  assert!(run_gitflow(&repo.path, &["check-clean"])?.status.success());

  repo.write_file("pom.xml", "<project/>")?;
  let output = run_gitflow(&repo.path, &["check-clean"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("uncommitted"));
  Ok(())
}

#[test]
fn test_tags_last() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.annotated_tag("v1.0")?;
  repo.annotated_tag("v1.1")?;
  repo.annotated_tag("v2.0")?;

  let output = run_gitflow(&repo.path, &["tags", "--last"])?;
  assert!(output.status.success());
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "v2.0");
  Ok(())
}

#[test]
fn test_doctor_json_reports_checks() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.branch("develop")?;

  let output = run_gitflow(&repo.path, &["doctor", "--json"])?;
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));

  let results: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let names: Vec<&str> = results
    .as_array()
    .map(|a| a.iter().filter_map(|r| r["check_name"].as_str()).collect())
    .unwrap_or_default();
  assert_eq!(names, vec!["config", "branch-model", "working-tree", "snapshot-dependencies"]);
  Ok(())
}

#[test]
fn test_doctor_fails_without_development_branch() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_gitflow(&repo.path, &["doctor"])?;
  assert_eq!(output.status.code(), Some(3));
  Ok(())
}
