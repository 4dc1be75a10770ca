use clap::{Parser, Subcommand};
use gitflow_mvn::commands;
use gitflow_mvn::core::error::{FlowError, print_error};
use gitflow_mvn::flow::BranchType;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Git-flow branch lifecycle automation for Maven projects
#[derive(Parser)]
#[command(name = "gitflow-mvn")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Log every git/mvn command line
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project root (defaults to the current directory)
  #[arg(short = 'C', long, global = true)]
  directory: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup & Inspection
  // ============================================================================
  /// Write gitflow.toml (if absent) and cache the branching model in git config
  Init {
    /// Overwrite an existing gitflow.toml with defaults
    #[arg(long)]
    force: bool,
  },

  /// Run health checks and diagnostics
  Doctor {
    /// Also compare the long-lived branches with the remote (fetches)
    #[arg(long)]
    thorough: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Branches
  // ============================================================================
  /// Check out a branch and apply its branch-type configuration
  Checkout {
    branch: String,
    /// Branch type (production, hotfix, release, development, feature, support)
    #[arg(long = "type")]
    branch_type: Option<BranchType>,
  },

  /// Create a branch from another one, check it out and apply its configuration
  Create {
    new_branch: String,
    /// Branch to start from
    #[arg(long)]
    from: String,
    /// Branch type of the new branch
    #[arg(long = "type")]
    branch_type: BranchType,
  },

  /// Fail if the working tree or index has uncommitted changes
  CheckClean,

  /// Fetch a branch and fail if the remote is ahead of it
  SyncCheck { branch: String },

  /// List branches whose name starts with a prefix
  Branches {
    pattern: String,
    /// Fetch and search this remote's branches instead of local ones
    #[arg(long)]
    remote: Option<String>,
    /// Only print the first match
    #[arg(long)]
    first: bool,
  },

  /// List tags, oldest first
  Tags {
    /// Only print the highest version tag
    #[arg(long)]
    last: bool,
  },

  // ============================================================================
  // Build
  // ============================================================================
  /// Fail on SNAPSHOT dependencies not produced by this build
  CheckSnapshots,

  /// Set the project version with versions-maven-plugin (or Tycho)
  SetVersion { version: String },

  /// Run Maven goals with the configured argument line
  Run { goals: String },
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match cli.directory {
    Some(dir) => dir,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(FlowError::from(e).context("Failed to get current directory")),
    },
  };

  let result = match cli.command {
    Commands::Init { force } => commands::run_init(&root, force),
    Commands::Doctor { thorough, json } => commands::run_doctor(&root, thorough, json),

    Commands::Checkout { branch, branch_type } => commands::run_checkout(&root, &branch, branch_type),
    Commands::Create {
      new_branch,
      from,
      branch_type,
    } => commands::run_create(&root, &new_branch, &from, branch_type),
    Commands::CheckClean => commands::run_check_clean(&root),
    Commands::SyncCheck { branch } => commands::run_sync_check(&root, &branch),
    Commands::Branches { pattern, remote, first } => {
      commands::run_branches(&root, &pattern, remote.as_deref(), first)
    }
    Commands::Tags { last } => commands::run_tags(&root, last),

    Commands::CheckSnapshots => commands::run_check_snapshots(&root),
    Commands::SetVersion { version } => commands::run_set_version(&root, &version),
    Commands::Run { goals } => commands::run_goals(&root, &goals),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn handle_error(err: FlowError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

fn get_styles() -> clap::builder::Styles {
  use anstyle::{AnsiColor, Color, Style};

  let color = |c: AnsiColor| Style::new().fg_color(Some(Color::Ansi(c)));
  clap::builder::Styles::styled()
    .usage(color(AnsiColor::Yellow).bold().underline())
    .header(color(AnsiColor::Yellow).bold().underline())
    .literal(color(AnsiColor::Green))
    .invalid(color(AnsiColor::Red).bold())
    .error(color(AnsiColor::Red).bold())
    .valid(color(AnsiColor::Green).bold().underline())
    .placeholder(color(AnsiColor::White))
}
