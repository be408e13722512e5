//! Implementation of the `makegen generate` command.
//!
//! Evaluates a configuration, registers its targets and writes the script to
//! stdout or to a file. A file is only replaced once the full script exists,
//! so a failing configuration leaves any previous script untouched.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use makegen_lib::script::{ScriptAssembler, ScriptOptions};

use super::load_registry;
use crate::output::print_success;

pub fn cmd_generate(config: &Path, output: Option<&Path>, no_banners: bool) -> Result<()> {
  let (variables, registry) = load_registry(config)?;
  let options = ScriptOptions { banners: !no_banners };
  let script = ScriptAssembler::new(&variables, &registry, options).render();

  match output {
    None => {
      let mut stdout = std::io::stdout().lock();
      stdout
        .write_all(script.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write script to stdout")?;
    }
    Some(path) => {
      write_atomically(path, &script)?;
      info!(path = %path.display(), bytes = script.len(), "script written");
      print_success(&format!("Wrote {} ({} targets)", path.display(), registry.len()));
    }
  }

  Ok(())
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut temp =
    NamedTempFile::new_in(dir).with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
  temp
    .write_all(contents.as_bytes())
    .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
  temp
    .persist(path)
    .with_context(|| format!("Failed to write script: {}", path.display()))?;
  Ok(())
}
