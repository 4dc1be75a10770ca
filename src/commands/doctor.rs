//! Health check command for diagnosing issues

use std::path::Path;

use crate::checks::{CheckContext, Severity, create_default_runner};
use crate::core::error::{ExitCode, FlowError, FlowResult};

/// Run every health check and report.
///
/// Error-severity failures exit with the validation exit code.
pub fn run_doctor(root: &Path, thorough: bool, json: bool) -> FlowResult<()> {
  let ctx = CheckContext {
    project_root: root.to_path_buf(),
    thorough,
  };

  let runner = create_default_runner();
  let results = runner.run_all(&ctx);
  let has_errors = results.iter().any(|r| !r.passed && r.severity == Severity::Error);

  if json {
    let json_output = serde_json::to_string_pretty(&results)
      .map_err(|e| FlowError::message(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json_output);
  } else {
    println!("🏥 Running health checks...\n");

    let mut has_warnings = false;
    for result in &results {
      let icon = if result.passed { "✅" } else { "❌" };
      println!("{} {}: {}", icon, result.check_name, result.message);

      if !result.passed {
        if let Some(ref suggestion) = result.suggestion {
          println!("   💡 Fix: {}", suggestion);
        }
        if result.severity == Severity::Warning {
          has_warnings = true;
        }
      }
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    println!("\nSummary: {}/{} checks passed", passed_count, results.len());

    if has_errors {
      println!("\n⚠️  Critical issues found. Please fix errors before proceeding.");
    } else if has_warnings {
      println!("\n⚠️  Some warnings found. Consider addressing them.");
    } else {
      println!("\n✨ All checks passed!");
    }
  }

  if has_errors {
    std::process::exit(ExitCode::Validation.as_i32());
  }
  Ok(())
}
