//! Snapshot dependency scan over real pom.xml files

use crate::helpers::*;
use anyhow::Result;
use gitflow_mvn::core::config::FlowConfig;
use gitflow_mvn::core::error::{FlowError, WorkflowError};
use gitflow_mvn::flow::Workflow;

const ROOT_POM: &str = r#"<project>
  <groupId>org.example</groupId>
  <artifactId>root</artifactId>
  <version>1.0</version>
  <packaging>pom</packaging>
  <modules>
    <module>a</module>
    <module>b</module>
  </modules>
</project>
"#;

const B_POM: &str = r#"<project>
  <groupId>org.example</groupId>
  <artifactId>b</artifactId>
  <version>1.0-SNAPSHOT</version>
</project>
"#;

fn a_pom(dependency: &str) -> String {
  format!(
    r#"<project>
  <groupId>org.example</groupId>
  <artifactId>a</artifactId>
  <version>1.0</version>
  <dependencies>
    {}
  </dependencies>
</project>
"#,
    dependency
  )
}

const DEP_ON_B: &str = "<dependency><groupId>org.example</groupId><artifactId>b</artifactId><version>1.0-SNAPSHOT</version></dependency>";
const DEP_ON_C: &str = "<dependency><groupId>org.other</groupId><artifactId>c</artifactId><version>2.0-SNAPSHOT</version></dependency>";

fn reactor_repo(a_dependency: &str) -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.write_file("pom.xml", ROOT_POM)?;
  repo.write_file("a/pom.xml", &a_pom(a_dependency))?;
  repo.write_file("b/pom.xml", B_POM)?;
  repo.commit("Multi-module project")?;
  Ok(repo)
}

#[test]
fn test_dependency_on_reactor_snapshot_is_allowed() -> Result<()> {
  let repo = reactor_repo(DEP_ON_B)?;
  let workflow = Workflow::with_config(&repo.path, FlowConfig::default())?;

  assert_eq!(workflow.reactor()?.descriptors().len(), 3);
  workflow.check_snapshot_dependencies()?;
  Ok(())
}

#[test]
fn test_external_snapshot_is_single_violation() -> Result<()> {
  let repo = reactor_repo(DEP_ON_C)?;
  let workflow = Workflow::with_config(&repo.path, FlowConfig::default())?;

  match workflow.check_snapshot_dependencies().unwrap_err() {
    FlowError::Workflow(WorkflowError::UnreleasedDependencies { violations }) => {
      assert_eq!(violations, vec!["org.example:a:1.0 -> org.other:c:2.0-SNAPSHOT"]);
    }
    other => panic!("unexpected error: {other}"),
  }
  Ok(())
}

#[test]
fn test_descriptors_reloaded_on_every_scan() -> Result<()> {
  let repo = reactor_repo(DEP_ON_B)?;
  let workflow = Workflow::with_config(&repo.path, FlowConfig::default())?;
  workflow.check_snapshot_dependencies()?;

  repo.write_file("a/pom.xml", &a_pom(DEP_ON_C))?;
  assert!(workflow.check_snapshot_dependencies().is_err());

  repo.write_file("a/pom.xml", &a_pom(""))?;
  workflow.check_snapshot_dependencies()?;
  Ok(())
}

#[test]
fn test_parent_managed_snapshot_version_is_violation() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(
    "pom.xml",
    r#"<project>
  <groupId>org.example</groupId>
  <artifactId>root</artifactId>
  <version>1.0</version>
  <packaging>pom</packaging>
  <modules>
    <module>a</module>
  </modules>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.other</groupId>
        <artifactId>c</artifactId>
        <version>2.0-SNAPSHOT</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>
"#,
  )?;
  repo.write_file(
    "a/pom.xml",
    r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>root</artifactId>
    <version>1.0</version>
  </parent>
  <artifactId>a</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.other</groupId>
      <artifactId>c</artifactId>
    </dependency>
  </dependencies>
</project>
"#,
  )?;
  repo.commit("Managed dependency versions")?;
  let workflow = Workflow::with_config(&repo.path, FlowConfig::default())?;

  match workflow.check_snapshot_dependencies().unwrap_err() {
    FlowError::Workflow(WorkflowError::UnreleasedDependencies { violations }) => {
      assert_eq!(violations, vec!["org.example:a:1.0 -> org.other:c:2.0-SNAPSHOT"]);
    }
    other => panic!("unexpected error: {other}"),
  }
  Ok(())
}

#[test]
fn test_allow_snapshots_skips_the_check() -> Result<()> {
  let repo = reactor_repo(DEP_ON_C)?;
  let mut config = FlowConfig::default();
  config.build.allow_snapshots = true;
  let workflow = Workflow::with_config(&repo.path, config)?;

  workflow.check_snapshot_dependencies()?;
  Ok(())
}
