//! Implementation of the `makegen check` command.

use std::path::Path;

use anyhow::Result;

use super::load_registry;
use crate::output::print_success;

pub fn cmd_check(config: &Path) -> Result<()> {
  let (variables, registry) = load_registry(config)?;

  print_success(&format!(
    "{}: {} target(s), {} variable(s)",
    config.display(),
    registry.len(),
    variables.len()
  ));
  Ok(())
}
