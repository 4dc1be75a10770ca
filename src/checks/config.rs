//! Configuration validity check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::FlowConfig;
use crate::core::error::FlowResult;

/// Validates `gitflow.toml` (or the defaults when absent)
pub struct ConfigCheck;

impl Check for ConfigCheck {
  fn name(&self) -> &str {
    "config"
  }

  fn description(&self) -> &str {
    "Validates gitflow.toml and the configured argument line"
  }

  fn run(&self, ctx: &CheckContext) -> FlowResult<CheckResult> {
    let config = match FlowConfig::load(&ctx.project_root) {
      Ok(config) => config,
      Err(err) => return Ok(CheckResult::error(self.name(), err.to_string(), err.help_message())),
    };

    let source = match FlowConfig::find_config_path(&ctx.project_root) {
      Some(path) => path.display().to_string(),
      None => "built-in defaults".to_string(),
    };

    Ok(
      CheckResult::pass(self.name(), format!("Configuration valid ({})", source)).with_details(serde_json::json!({
        "production_branch": config.flow.production_branch,
        "development_branch": config.flow.development_branch,
        "changelist_enabled": config.changelist.is_enabled(),
      })),
    )
  }
}
