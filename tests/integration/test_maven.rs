//! Maven operations against a stub executable recording its arguments

#![cfg(unix)]

use crate::helpers::*;
use anyhow::Result;
use gitflow_mvn::core::config::FlowConfig;
use gitflow_mvn::core::error::{CommandError, FlowError};
use gitflow_mvn::flow::{BranchType, Workflow};
use tempfile::TempDir;

fn workflow_with_stub(repo: &TestRepo, stub_dir: &TempDir, exit_code: i32, edit: impl FnOnce(&mut FlowConfig)) -> Result<Workflow> {
  let stub = stub_maven(stub_dir.path(), exit_code)?;
  let mut config = FlowConfig::default();
  config.build.executable = Some(stub.to_string_lossy().into_owned());
  edit(&mut config);
  Ok(Workflow::with_config(&repo.path, config)?)
}

#[test]
fn test_set_versions_with_property_and_timestamp() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |c| {
    c.build.arg_line = Some("-B".to_string());
    c.build.versions_force_update = true;
    c.build.version_property = Some("revision".to_string());
  })?;

  workflow.set_versions("1.2.0")?;

  let calls = recorded_maven_calls(stubs.path())?;
  assert_eq!(calls.len(), 2);
  assert_eq!(
    calls[0],
    "-DgenerateBackupPoms=false -DnewVersion=1.2.0 org.codehaus.mojo:versions-maven-plugin:set -DgroupId= -DartifactId= org.codehaus.mojo:versions-maven-plugin:set-property -Dproperty=revision -B"
  );
  assert!(calls[1].starts_with(
    "org.codehaus.mojo:versions-maven-plugin:set-property -DgenerateBackupPoms=false -Dproperty=project.build.outputTimestamp -DnewVersion="
  ));
  assert!(calls[1].ends_with("Z -B"));
  Ok(())
}

#[test]
fn test_skip_update_version_without_property_runs_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |c| c.build.skip_update_version = true)?;

  workflow.set_versions("2.0.0")?;
  assert!(recorded_maven_calls(stubs.path())?.is_empty());
  Ok(())
}

#[test]
fn test_timestamp_refresh_can_be_disabled() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |c| c.build.update_output_timestamp = false)?;

  workflow.set_versions("2.0.0")?;
  assert_eq!(
    recorded_maven_calls(stubs.path())?,
    vec!["-DgenerateBackupPoms=false -DnewVersion=2.0.0 org.codehaus.mojo:versions-maven-plugin:set"]
  );
  Ok(())
}

#[test]
fn test_tycho_set_version() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |c| {
    c.build.tycho_build = true;
    c.build.version_property = Some("releaseVersion".to_string());
  })?;

  workflow.set_versions("3.1.0")?;
  assert_eq!(
    recorded_maven_calls(stubs.path())?,
    vec!["org.eclipse.tycho:tycho-versions-plugin:set-version -Dproperties=releaseVersion -DnewVersion=3.1.0 -Dtycho.mode=maven"]
  );

  workflow.clean_test()?;
  assert_eq!(recorded_maven_calls(stubs.path())?[1], "clean verify");
  Ok(())
}

#[test]
fn test_tycho_set_version_without_property() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |c| c.build.tycho_build = true)?;

  workflow.set_versions("3.2.0")?;
  assert_eq!(
    recorded_maven_calls(stubs.path())?,
    vec!["org.eclipse.tycho:tycho-versions-plugin:set-version -DnewVersion=3.2.0 -Dtycho.mode=maven"]
  );
  Ok(())
}

#[test]
fn test_goals_receive_current_arg_line() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.branch("develop")?;
  let stubs = TempDir::new()?;
  let mut workflow = workflow_with_stub(&repo, &stubs, 0, |c| {
    c.build.arg_line = Some("-DskipITs".to_string());
    c.changelist.values.set(BranchType::Development, Some("-SNAPSHOT".to_string()));
  })?;

  workflow.clean_test()?;
  workflow.checkout_with_config(BranchType::Development, "develop")?;
  workflow.clean_install()?;
  workflow.run_goals("deploy -P 'release profile'")?;

  assert_eq!(
    recorded_maven_calls(stubs.path())?,
    vec![
      "clean test -DskipITs",
      "clean install -DskipITs -Dchangelist=-SNAPSHOT",
      "deploy -P release profile -DskipITs -Dchangelist=-SNAPSHOT",
    ]
  );
  Ok(())
}

#[test]
fn test_failing_build_reports_stdout() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 1, |_| {})?;

  match workflow.clean_install().unwrap_err() {
    FlowError::Command(CommandError::Failed { exit_code, output, .. }) => {
      assert_eq!(exit_code, 1);
      assert!(output.contains("BUILD FAILURE"));
    }
    other => panic!("unexpected error: {other}"),
  }
  Ok(())
}

#[test]
fn test_current_project_version_reads_disk() -> Result<()> {
  let repo = TestRepo::new()?;
  let stubs = TempDir::new()?;
  let workflow = workflow_with_stub(&repo, &stubs, 0, |_| {})?;

  assert_eq!(workflow.current_project_version()?, "1.0.0-SNAPSHOT");
  repo.write_file("pom.xml", &SIMPLE_POM.replace("1.0.0-SNAPSHOT", "1.0.0"))?;
  assert_eq!(workflow.current_project_version()?, "1.0.0");
  Ok(())
}
