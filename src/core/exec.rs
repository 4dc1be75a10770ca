//! Synchronous external command execution
//!
//! Two entry points share one primitive:
//! - [`Executor::run_checked`] fails with [`CommandError::Failed`] on a non-zero exit
//! - [`Executor::run_probe`] hands back the exit code for the caller to interpret
//!
//! Both block until the child exits. There is no timeout.

use crate::core::error::{CommandError, FlowError, FlowResult};
use crate::core::validate::is_blank;
use crate::flow::argline::split_arg_line;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
  pub exit_code: i32,
  pub stdout: String,
  pub stderr: String,
}

impl CommandResult {
  pub fn success(&self) -> bool {
    self.exit_code == 0
  }

  /// stderr, or stdout when stderr is blank (some tools only report on stdout)
  pub fn diagnostic(&self) -> &str {
    if is_blank(&self.stderr) && !is_blank(&self.stdout) {
      &self.stdout
    } else {
      &self.stderr
    }
  }
}

/// Default executable resolution, applied once when no override is configured
#[derive(Debug, Clone, Copy)]
enum Fallback {
  Git,
  Maven,
}

/// Runs one external tool in a fixed working directory
#[derive(Debug)]
pub struct Executor {
  explicit: Option<String>,
  fallback: Fallback,
  resolved: OnceLock<String>,
  work_dir: PathBuf,
  verbose: bool,
}

impl Executor {
  /// Executor for git; defaults to `git` on PATH
  pub fn git(work_dir: &Path, explicit: Option<String>, verbose: bool) -> Self {
    Self::new(work_dir, explicit, Fallback::Git, verbose)
  }

  /// Executor for mvn; defaults to the project's `mvnw` wrapper when present, else `mvn`
  pub fn maven(work_dir: &Path, explicit: Option<String>, verbose: bool) -> Self {
    Self::new(work_dir, explicit, Fallback::Maven, verbose)
  }

  fn new(work_dir: &Path, explicit: Option<String>, fallback: Fallback, verbose: bool) -> Self {
    Self {
      explicit,
      fallback,
      resolved: OnceLock::new(),
      work_dir: work_dir.to_path_buf(),
      verbose,
    }
  }

  pub fn work_dir(&self) -> &Path {
    &self.work_dir
  }

  /// The executable, resolved on first use and fixed afterwards
  pub fn program(&self) -> &str {
    self.resolved.get_or_init(|| match self.explicit.as_deref() {
      Some(path) if !is_blank(path) => path.to_string(),
      _ => match self.fallback {
        Fallback::Git => "git".to_string(),
        Fallback::Maven => maven_default(&self.work_dir),
      },
    })
  }

  /// Run and fail on a non-zero exit code.
  ///
  /// `tail` is tokenized shell-style and appended after `args`.
  pub fn run_checked(&self, args: &[&str], tail: Option<&str>) -> FlowResult<CommandResult> {
    let result = self.run(args, tail)?;
    if !result.success() {
      let command = self.describe(args, tail);
      debug!("'{}' exited with code {}", command, result.exit_code);
      return Err(FlowError::Command(CommandError::Failed {
        command,
        exit_code: result.exit_code,
        output: result.diagnostic().to_string(),
      }));
    }
    Ok(result)
  }

  /// Run and return the exit code without judging it.
  ///
  /// Only a failure to start the executable is an error.
  pub fn run_probe(&self, args: &[&str]) -> FlowResult<CommandResult> {
    self.run(args, None)
  }

  fn run(&self, args: &[&str], tail: Option<&str>) -> FlowResult<CommandResult> {
    let command_line = self.describe(args, tail);
    debug!("{}", command_line);

    let mut cmd = Command::new(self.program());
    cmd.current_dir(&self.work_dir);
    cmd.args(args);
    if let Some(tail) = tail.filter(|t| !is_blank(t)) {
      cmd.args(split_arg_line(tail)?);
    }

    let output = cmd.output().map_err(|source| {
      FlowError::Command(CommandError::Spawn {
        command: command_line.clone(),
        source,
      })
    })?;

    let result = CommandResult {
      exit_code: output.status.code().unwrap_or(-1),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if self.verbose {
      for line in result.stdout.lines() {
        info!("{}", line);
      }
    }

    Ok(result)
  }

  fn describe(&self, args: &[&str], tail: Option<&str>) -> String {
    let mut parts = vec![self.program()];
    parts.extend(args.iter().copied());
    if let Some(tail) = tail.filter(|t| !is_blank(t)) {
      parts.push(tail);
    }
    parts.join(" ")
  }
}

/// Prefer the Maven wrapper shipped with the project, as `mvnw` itself would be the launcher
fn maven_default(work_dir: &Path) -> String {
  let wrapper = if cfg!(windows) { "mvnw.cmd" } else { "mvnw" };
  let path = work_dir.join(wrapper);
  if path.is_file() {
    path.to_string_lossy().into_owned()
  } else {
    "mvn".to_string()
  }
}
