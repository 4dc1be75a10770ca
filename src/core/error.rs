//! Error types for gitflow-mvn with contextual messages and exit codes
//!
//! Every failure the engine can report falls in one of four categories:
//! configuration problems, failed external commands, workflow refusals
//! (diverged branches, dirty trees, unreleased dependencies) and plain I/O.
//! Each category carries an optional help line printed below the error.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for gitflow-mvn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, disallowed input, missing files)
  User = 1,
  /// System error (git, mvn, I/O)
  System = 2,
  /// Validation failure (diverged branch, snapshot dependencies, dirty tree)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for gitflow-mvn
#[derive(Debug)]
pub enum FlowError {
  /// Configuration errors (disallowed input, unconfigured state)
  Config(ConfigError),

  /// External command errors (git or mvn returned a failure)
  Command(CommandError),

  /// Workflow refusals
  Workflow(WorkflowError),

  /// I/O errors
  Io(io::Error),

  /// A categorized error with context lines added by callers
  Context { error: Box<FlowError>, context: String },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FlowError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FlowError::Message { message, context, help } => FlowError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FlowError::Io(e) => FlowError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      FlowError::Context { error, context } => FlowError::Context {
        error,
        context: format!("{}\n{}", ctx_str, context),
      },
      error => FlowError::Context {
        error: Box::new(error),
        context: ctx_str,
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FlowError::Config(_) => ExitCode::User,
      FlowError::Command(_) => ExitCode::System,
      FlowError::Workflow(_) => ExitCode::Validation,
      FlowError::Io(_) => ExitCode::System,
      FlowError::Context { error, .. } => error.exit_code(),
      FlowError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FlowError::Config(e) => e.help_message(),
      FlowError::Command(e) => e.help_message(),
      FlowError::Workflow(e) => e.help_message(),
      FlowError::Context { error, .. } => error.help_message(),
      FlowError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for FlowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FlowError::Config(e) => write!(f, "{}", e),
      FlowError::Command(e) => write!(f, "{}", e),
      FlowError::Workflow(e) => write!(f, "{}", e),
      FlowError::Io(e) => write!(f, "I/O error: {}", e),
      FlowError::Context { error, context } => write!(f, "{}\n{}", error, context),
      FlowError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FlowError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FlowError::Io(e) => Some(e),
      FlowError::Command(CommandError::Spawn { source, .. }) => Some(source),
      FlowError::Context { error, .. } => Some(error.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for FlowError {
  fn from(err: io::Error) -> Self {
    FlowError::Io(err)
  }
}

impl From<String> for FlowError {
  fn from(msg: String) -> Self {
    FlowError::message(msg)
  }
}

impl From<&str> for FlowError {
  fn from(msg: &str) -> Self {
    FlowError::message(msg)
  }
}

impl From<ConfigError> for FlowError {
  fn from(err: ConfigError) -> Self {
    FlowError::Config(err)
  }
}

impl From<CommandError> for FlowError {
  fn from(err: CommandError) -> Self {
    FlowError::Command(err)
  }
}

impl From<WorkflowError> for FlowError {
  fn from(err: WorkflowError) -> Self {
    FlowError::Workflow(err)
  }
}

impl From<toml_edit::de::Error> for FlowError {
  fn from(err: toml_edit::de::Error) -> Self {
    FlowError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for FlowError {
  fn from(err: toml_edit::ser::Error) -> Self {
    FlowError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for FlowError {
  fn from(err: serde_json::Error) -> Self {
    FlowError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A user-supplied value contains a shell separator (`&`, `|`, `;`)
  DisallowedValue { value: String },

  /// The configured argument line contains a shell separator
  DisallowedArgLine,

  /// Required configuration is missing or unusable
  Invalid { message: String },

  /// A string could not be interpreted as a branch type
  UnknownBranchType { value: String },

  /// The project descriptor could not be read or interpreted
  Descriptor { path: PathBuf, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::DisallowedValue { .. } | ConfigError::DisallowedArgLine => {
        Some("The characters '&', '|' and ';' are not allowed in values passed to git or mvn.".to_string())
      }
      ConfigError::UnknownBranchType { .. } => {
        Some("Use one of: production, hotfix, release, development, feature, support.".to_string())
      }
      ConfigError::Descriptor { .. } => {
        Some("Run the command from the directory containing the parent pom.xml.".to_string())
      }
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::DisallowedValue { value } => {
        write!(f, "The '{}' value doesn't match allowed pattern.", value)
      }
      ConfigError::DisallowedArgLine => write!(f, "The argLine doesn't match allowed pattern."),
      ConfigError::Invalid { message } => write!(f, "{}", message),
      ConfigError::UnknownBranchType { value } => write!(f, "Unknown branch type '{}'", value),
      ConfigError::Descriptor { path, reason } => {
        write!(f, "Error re-loading project info from {}: {}", path.display(), reason)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// The command ran and returned a non-zero exit code
  Failed {
    command: String,
    exit_code: i32,
    output: String,
  },

  /// The executable could not be started at all
  Spawn { command: String, source: io::Error },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Spawn { .. } => {
        Some("Check that the executable is installed and on PATH, or set it explicitly in gitflow.toml.".to_string())
      }
      CommandError::Failed { output, .. } => {
        if output.contains("non-fast-forward") || output.contains("Not possible to fast-forward") {
          Some("The branches have diverged. Merge or rebase manually, then re-run.".to_string())
        } else if output.contains("CONFLICT") {
          Some("Resolve the merge conflicts, commit, and re-run the command.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Failed {
        command,
        exit_code,
        output,
      } => {
        if output.trim().is_empty() {
          write!(f, "'{}' failed with exit code {}", command, exit_code)
        } else {
          write!(f, "{}", output.trim_end())
        }
      }
      CommandError::Spawn { command, source } => write!(f, "Failed to execute '{}': {}", command, source),
    }
  }
}

/// Workflow refusals
#[derive(Debug)]
pub enum WorkflowError {
  /// The remote branch has commits the local branch lacks
  Diverged { remote: String, branch: String },

  /// The working tree or index has uncommitted changes
  UncommittedChanges,

  /// Dependencies on unreleased versions that this build does not produce
  UnreleasedDependencies { violations: Vec<String> },
}

impl WorkflowError {
  fn help_message(&self) -> Option<String> {
    match self {
      WorkflowError::Diverged { .. } => Some("Execute git pull.".to_string()),
      WorkflowError::UncommittedChanges => None,
      WorkflowError::UnreleasedDependencies { .. } => {
        Some(
          "Change them to released versions (see the warnings above), or set `allow_snapshots = true` under [build] in gitflow.toml to skip this check."
            .to_string(),
        )
      }
    }
  }
}

impl fmt::Display for WorkflowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WorkflowError::Diverged { remote, branch } => write!(
        f,
        "Remote branch '{}/{}' is ahead of the local branch '{}'. Execute git pull.",
        remote, branch, branch
      ),
      WorkflowError::UncommittedChanges => write!(
        f,
        "You have some uncommitted files. Commit or discard local changes in order to proceed."
      ),
      WorkflowError::UnreleasedDependencies { violations } => {
        write!(f, "There is some SNAPSHOT dependencies in the project:")?;
        for v in violations {
          write!(f, "\n  {}", v)?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for gitflow-mvn
pub type FlowResult<T> = Result<T, FlowError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> FlowResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FlowError>,
{
  fn context(self, ctx: impl Into<String>) -> FlowResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FlowError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
