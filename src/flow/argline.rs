//! Argument line handling
//!
//! An argument line is a single space-delimited string of `-Dkey=value`
//! assignments mixed with passthrough tokens, forwarded verbatim to mvn.

use crate::core::error::{ConfigError, FlowError, FlowResult};
use crate::core::validate::is_blank;

/// Set, replace or remove the `-Dkey=` token in an argument line.
///
/// - line blank or without the token, value absent: line returned unchanged
/// - line blank or without the token, value present: `-Dkey=value` appended
///   with one separating space (none when the line is blank)
/// - line with the token: every `-Dkey=<non-space run>` is replaced by the new
///   token, or deleted when the value is absent
pub fn set_or_replace(key: &str, value: Option<&str>, line: Option<&str>) -> Option<String> {
  let prefix = format!("-D{}=", key);
  let replacement = value.map(|v| format!("{}{}", prefix, v));

  match line {
    Some(current) if !is_blank(current) && current.contains(&prefix) => {
      Some(replace_tokens(current, &prefix, replacement.as_deref().unwrap_or("")))
    }
    _ => match replacement {
      None => line.map(str::to_string),
      Some(token) => match line {
        Some(current) if !is_blank(current) => Some(format!("{} {}", current, token)),
        _ => Some(token),
      },
    },
  }
}

fn replace_tokens(line: &str, prefix: &str, replacement: &str) -> String {
  let mut out = String::with_capacity(line.len() + replacement.len());
  let mut rest = line;
  while let Some(idx) = rest.find(prefix) {
    out.push_str(&rest[..idx]);
    out.push_str(replacement);
    let after = &rest[idx + prefix.len()..];
    let end = after.find(char::is_whitespace).unwrap_or(after.len());
    rest = &after[end..];
  }
  out.push_str(rest);
  out
}

/// Split a command-line string into arguments, honouring single and double quotes.
///
/// Quotes group whitespace into one argument and are removed; there are no
/// escape sequences.
pub fn split_arg_line(line: &str) -> FlowResult<Vec<String>> {
  let mut args = Vec::new();
  let mut current = String::new();
  let mut quote: Option<char> = None;
  let mut has_token = false;

  for c in line.chars() {
    match quote {
      Some(q) if c == q => quote = None,
      Some(_) => current.push(c),
      None if c == '"' || c == '\'' => {
        quote = Some(c);
        has_token = true;
      }
      None if c.is_whitespace() => {
        if has_token {
          args.push(std::mem::take(&mut current));
          has_token = false;
        }
      }
      None => {
        current.push(c);
        has_token = true;
      }
    }
  }

  if quote.is_some() {
    return Err(FlowError::Config(ConfigError::Invalid {
      message: format!("Unbalanced quotes in '{}'", line),
    }));
  }
  if has_token {
    args.push(current);
  }

  Ok(args)
}
