//! Input validation for values interpolated into git/mvn command lines
//!
//! Commands are never run through a shell, but argument lines are tokenized
//! and forwarded to `mvn`, whose launcher scripts are. Any shell separator in
//! a user-supplied value is refused before it reaches the executor.

use crate::core::error::{ConfigError, FlowError, FlowResult};
use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[&|;]").expect("valid pattern"));

/// True when the value is empty or only whitespace
pub fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

/// True when the value is non-blank and contains a shell separator
pub fn is_disallowed(value: &str) -> bool {
  !is_blank(value) && DISALLOWED.is_match(value)
}

/// Reject any non-blank value containing `&`, `|` or `;`.
///
/// The first offending value is named in the error.
pub fn validate<S: AsRef<str>>(values: &[S]) -> FlowResult<()> {
  for value in values {
    let value = value.as_ref();
    if is_disallowed(value) {
      return Err(FlowError::Config(ConfigError::DisallowedValue {
        value: value.to_string(),
      }));
    }
  }
  Ok(())
}

/// Validate the global argument line, then every parameter.
pub fn validate_configuration<S: AsRef<str>>(arg_line: Option<&str>, params: &[S]) -> FlowResult<()> {
  if arg_line.is_some_and(is_disallowed) {
    return Err(FlowError::Config(ConfigError::DisallowedArgLine));
  }
  validate(params)
}
