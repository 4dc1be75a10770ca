//! `@{key}` placeholders in commit, merge and tag messages

use std::collections::BTreeMap;

/// Placeholder name to replacement text
pub type MessageProperties = BTreeMap<String, String>;

/// Replace every `@{key}` with its mapped value.
///
/// Placeholders without a mapping are left as written.
pub fn replace_properties(message: &str, properties: &MessageProperties) -> String {
  properties.iter().fold(message.to_string(), |acc, (key, value)| {
    acc.replace(&format!("@{{{}}}", key), value)
  })
}

/// Prepend the configured prefix when it is non-blank
pub(crate) fn with_prefix(message: &str, prefix: Option<&str>) -> String {
  match prefix {
    Some(p) if !p.trim().is_empty() => format!("{}{}", p, message),
    _ => message.to_string(),
  }
}
