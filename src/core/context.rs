//! Mutable build state owned by one workflow run
//!
//! # Design
//!
//! The argument line handed to mvn changes every time a different branch type
//! is checked out. Instead of process-wide state, the current line, its
//! immutable baseline and the session user properties live here and are
//! threaded through the workflow.
//!
//! ```text
//! Workflow::checkout_with_config(type, branch)
//!   |- SystemGit::checkout(branch)
//!   '- propagate::apply(&mut FlowContext, type)
//!        |- user_properties[key] = value, user_properties["argLine"] updated
//!        '- arg_line = set_or_replace(key, value, original_arg_line)
//! Maven::clean_install(&FlowContext)  -> mvn clean install <arg_line>
//! ```

use crate::flow::argline::set_or_replace;
use crate::core::validate::is_blank;
use std::collections::BTreeMap;

/// User property holding an argument line of its own
pub const ARG_LINE_PROPERTY: &str = "argLine";

/// Argument lines and session user properties for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowContext {
  original_arg_line: Option<String>,
  arg_line: Option<String>,
  user_properties: BTreeMap<String, String>,
}

impl FlowContext {
  /// Start a run from the configured argument line, which becomes the baseline
  pub fn new(arg_line: Option<String>) -> Self {
    Self {
      original_arg_line: arg_line.clone(),
      arg_line,
      user_properties: BTreeMap::new(),
    }
  }

  /// Current argument line appended to mvn invocations
  pub fn arg_line(&self) -> Option<&str> {
    self.arg_line.as_deref()
  }

  /// The line as configured, before any branch-type switch
  pub fn original_arg_line(&self) -> Option<&str> {
    self.original_arg_line.as_deref()
  }

  /// Session user properties; override descriptor properties on reload
  pub fn user_properties(&self) -> &BTreeMap<String, String> {
    &self.user_properties
  }

  /// Set or remove a property in the user properties and the argument line.
  ///
  /// The new argument line is always derived from the baseline, so a value
  /// set for one branch type never survives a switch to another.
  pub fn set_property(&mut self, key: &str, value: Option<&str>) {
    if is_blank(key) {
      return;
    }

    let nested = self.user_properties.get(ARG_LINE_PROPERTY).map(String::as_str);
    match set_or_replace(key, value, nested) {
      Some(line) => {
        self.user_properties.insert(ARG_LINE_PROPERTY.to_string(), line);
      }
      None => {
        self.user_properties.remove(ARG_LINE_PROPERTY);
      }
    }

    match value {
      Some(v) => {
        self.user_properties.insert(key.to_string(), v.to_string());
      }
      None => {
        self.user_properties.remove(key);
      }
    }

    self.arg_line = set_or_replace(key, value, self.original_arg_line.as_deref());
  }
}
