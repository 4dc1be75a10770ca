//! Maven invocations
//!
//! Every call appends the run's current argument line as its tail.

use crate::build::pom::{DESCRIPTOR_FILE, ProjectLoader, ProjectModel};
use crate::core::config::BuildConfig;
use crate::core::context::FlowContext;
use crate::core::error::{ConfigError, FlowError, FlowResult};
use crate::core::exec::Executor;
use crate::core::validate::is_blank;
use crate::flow::argline::split_arg_line;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

const VERSIONS_SET_GOAL: &str = "org.codehaus.mojo:versions-maven-plugin:set";
const VERSIONS_SET_PROPERTY_GOAL: &str = "org.codehaus.mojo:versions-maven-plugin:set-property";
const TYCHO_SET_VERSION_GOAL: &str = "org.eclipse.tycho:tycho-versions-plugin:set-version";

/// Reproducible-builds timestamp property refreshed after version changes
pub const OUTPUT_TIMESTAMP_PROPERTY: &str = "project.build.outputTimestamp";

/// Maven operations for one project directory
pub struct Maven {
  exec: Executor,
  settings: BuildConfig,
}

impl Maven {
  pub fn new(work_dir: &Path, settings: &BuildConfig, verbose: bool) -> Self {
    Self {
      exec: Executor::maven(work_dir, settings.executable.clone(), verbose),
      settings: settings.clone(),
    }
  }

  /// Resolved mvn executable
  pub fn program(&self) -> &str {
    self.exec.program()
  }

  /// Root descriptor of the project
  pub fn root_descriptor(&self) -> PathBuf {
    self.exec.work_dir().join(DESCRIPTOR_FILE)
  }

  fn execute(&self, ctx: &FlowContext, args: &[&str]) -> FlowResult<()> {
    self.exec.run_checked(args, ctx.arg_line())?;
    Ok(())
  }

  fn reload_root(&self, ctx: &FlowContext, loader: &dyn ProjectLoader) -> FlowResult<ProjectModel> {
    loader.load(&self.root_descriptor(), ctx.user_properties())
  }

  /// Set the project version, plus the version property when one is configured.
  ///
  /// Non-Tycho builds then refresh `project.build.outputTimestamp` when enabled.
  pub fn set_versions(&self, ctx: &FlowContext, loader: &dyn ProjectLoader, version: &str) -> FlowResult<()> {
    info!("Updating version(s) to '{}'.", version);

    let new_version = format!("-DnewVersion={}", version);
    let version_property = self.settings.version_property.as_deref().filter(|p| !is_blank(p));

    if self.settings.tycho_build {
      let mut args = vec![TYCHO_SET_VERSION_GOAL.to_string()];
      if let Some(property) = version_property {
        info!("Updating property '{}' to '{}'.", property, version);
        args.push(format!("-Dproperties={}", property));
      }
      args.extend([new_version, "-Dtycho.mode=maven".to_string()]);
      let args: Vec<&str> = args.iter().map(String::as_str).collect();
      return self.execute(ctx, &args);
    }

    let mut args: Vec<String> = vec!["-DgenerateBackupPoms=false".to_string(), new_version];
    if !self.settings.skip_update_version {
      args.push(VERSIONS_SET_GOAL.to_string());
      if self.settings.versions_force_update {
        args.extend(["-DgroupId=".to_string(), "-DartifactId=".to_string()]);
      }
    }
    if let Some(property) = version_property {
      info!("Updating property '{}' to '{}'.", property, version);
      args.extend([VERSIONS_SET_PROPERTY_GOAL.to_string(), format!("-Dproperty={}", property)]);
    }
    if args.len() == 2 {
      return Ok(());
    }

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    self.execute(ctx, &args)?;

    if self.settings.update_output_timestamp {
      let current = self.reload_root(ctx, loader)?.properties.get(OUTPUT_TIMESTAMP_PROPERTY).cloned();
      if let Some(timestamp) = current.and_then(|c| refreshed_timestamp(&c, Utc::now())) {
        info!("Updating property '{}' to '{}'.", OUTPUT_TIMESTAMP_PROPERTY, timestamp);
        let property = format!("-Dproperty={}", OUTPUT_TIMESTAMP_PROPERTY);
        let value = format!("-DnewVersion={}", timestamp);
        self.execute(ctx, &[VERSIONS_SET_PROPERTY_GOAL, "-DgenerateBackupPoms=false", &property, &value])?;
      }
    }
    Ok(())
  }

  /// `clean test`, or `clean verify` for Tycho builds
  pub fn clean_test(&self, ctx: &FlowContext) -> FlowResult<()> {
    info!("Cleaning and testing the project.");
    if self.settings.tycho_build {
      self.execute(ctx, &["clean", "verify"])
    } else {
      self.execute(ctx, &["clean", "test"])
    }
  }

  pub fn clean_install(&self, ctx: &FlowContext) -> FlowResult<()> {
    info!("Cleaning and installing the project.");
    self.execute(ctx, &["clean", "install"])
  }

  /// Run arbitrary goals, tokenized like a shell command line
  pub fn run_goals(&self, ctx: &FlowContext, goals: &str) -> FlowResult<()> {
    info!("Running Maven goals: {}", goals);
    let tokens = split_arg_line(goals)?;
    let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
    self.execute(ctx, &args)
  }

  /// Version of the root project, reloaded from disk
  pub fn current_project_version(&self, ctx: &FlowContext, loader: &dyn ProjectLoader) -> FlowResult<String> {
    let model = self.reload_root(ctx, loader)?;
    model.version().map(str::to_string).ok_or_else(|| {
      FlowError::Config(ConfigError::Invalid {
        message: "Cannot get current project version. This command should be executed from the parent project."
          .to_string(),
      })
    })
  }
}

/// Replacement for an existing output timestamp.
///
/// Values of one character or less are left alone. All-digit values are epoch
/// seconds; anything else becomes ISO-8601 UTC.
pub fn refreshed_timestamp(current: &str, now: DateTime<Utc>) -> Option<String> {
  if current.chars().count() <= 1 {
    return None;
  }
  if current.chars().all(|c| c.is_ascii_digit()) {
    Some(now.timestamp().to_string())
  } else {
    Some(now.format("%Y-%m-%dT%H:%M:%SZ").to_string())
  }
}
