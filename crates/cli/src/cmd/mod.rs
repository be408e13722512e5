mod check;
mod generate;
mod info;
mod targets;

pub use check::cmd_check;
pub use generate::cmd_generate;
pub use info::cmd_info;
pub use targets::cmd_targets;

use std::path::Path;

use anyhow::{Context, Result};

use makegen_lib::config::{GlobalVariables, evaluate_config};
use makegen_lib::registry::TargetRegistry;

/// Evaluate `config` and register every declared target.
fn load_registry(config: &Path) -> Result<(GlobalVariables, TargetRegistry)> {
  let evaluated =
    evaluate_config(config)
      // EvalError wraps mlua::Error, which is not Send + Sync; keep its message.
      .map_err(|e| anyhow::anyhow!(e.to_string()))
      .with_context(|| format!("Failed to evaluate config: {}", config.display()))?;
  evaluated
    .into_registry()
    .with_context(|| format!("Invalid configuration: {}", config.display()))
}
