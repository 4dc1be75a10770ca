//! Check trait abstraction for repository health checks
//!
//! Every check implements [`Check`] and is registered in
//! [`create_default_runner`](super::create_default_runner). The `doctor`
//! command prints the collected [`CheckResult`]s, or emits them as JSON.

use crate::core::error::FlowResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Severity level for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
  /// Informational message (not an issue)
  Info,
  /// Non-blocking, but should be addressed before a release
  Warning,
  /// Blocking, the workflow commands will refuse to run
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "INFO"),
      Severity::Warning => write!(f, "WARN"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// Result of running a check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
  pub check_name: String,
  pub passed: bool,
  pub severity: Severity,
  pub message: String,
  pub suggestion: Option<String>,
  /// Additional metadata (for JSON output)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

impl CheckResult {
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: true,
      severity: Severity::Info,
      message: message.into(),
      suggestion: None,
      details: None,
    }
  }

  pub fn error(check_name: impl Into<String>, message: impl Into<String>, suggestion: Option<impl Into<String>>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Error,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
      details: None,
    }
  }

  pub fn warning(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Warning,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
      details: None,
    }
  }

  pub fn with_details(mut self, details: serde_json::Value) -> Self {
    self.details = Some(details);
    self
  }
}

/// Context passed to checks
#[derive(Debug, Clone)]
pub struct CheckContext {
  /// Project root (git working tree holding the root pom.xml)
  pub project_root: PathBuf,
  /// Whether to run checks that talk to the remote
  pub thorough: bool,
}

/// Health check trait
///
/// ```rust,ignore
/// struct MyCheck;
///
/// impl Check for MyCheck {
///   fn name(&self) -> &str {
///     "my-check"
///   }
///
///   fn description(&self) -> &str {
///     "Validates my requirement"
///   }
///
///   fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
///     Ok(CheckResult::pass(self.name(), "All good"))
///   }
/// }
/// ```
pub trait Check: Send + Sync {
  /// Unique name for this check (kebab-case)
  fn name(&self) -> &str;

  /// Human-readable description of what this check validates
  fn description(&self) -> &str;

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult>;

  /// Whether this check needs the network (only run with `--thorough`)
  fn is_expensive(&self) -> bool {
    false
  }
}
