use std::path::Path;

use crate::core::config::FlowConfig;
use crate::core::error::FlowResult;
use crate::core::vcs::SystemGit;

/// Write a default gitflow.toml when none exists, then cache the model in git config
pub fn run_init(root: &Path, force: bool) -> FlowResult<()> {
  let config = if FlowConfig::exists(root) && !force {
    println!("📄 Using existing configuration");
    FlowConfig::load(root)?
  } else {
    let config = FlowConfig::default();
    config.save(root)?;
    println!("📝 Wrote {}", root.join("gitflow.toml").display());
    config
  };

  let git = SystemGit::open(root, &config)?;
  git.init_config()?;
  println!(
    "✅ Branching model cached in git config ({} / {})",
    config.flow.production_branch, config.flow.development_branch
  );
  Ok(())
}
