//! Implementation of the `makegen targets` command.

use std::path::Path;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use makegen_lib::registry::TargetRegistry;

use super::load_registry;
use crate::output::{OutputFormat, print_info, print_json};

#[derive(Debug, Serialize)]
struct TargetRow<'a> {
  key: &'a str,
  name: Option<&'a str>,
  strategy: &'static str,
  prefix: &'a str,
  output: String,
  deps: &'a [String],
}

fn rows(registry: &TargetRegistry) -> Vec<TargetRow<'_>> {
  registry
    .all()
    .iter()
    .map(|t| TargetRow {
      key: &t.key,
      name: t.display_name.as_deref(),
      strategy: t.strategy().as_str(),
      prefix: &t.prefix,
      output: t.output_path(),
      deps: &t.dependencies,
    })
    .collect()
}

pub fn cmd_targets(config: &Path, format: OutputFormat) -> Result<()> {
  let (_, registry) = load_registry(config)?;
  let rows = rows(&registry);

  if format.is_json() {
    return print_json(&rows);
  }

  if rows.is_empty() {
    print_info("No targets declared.");
    return Ok(());
  }

  let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
  for row in &rows {
    let padded = format!("{:<width$}", row.key, width = key_width);
    println!(
      "{}  {:<9}  {}",
      padded.if_supports_color(Stream::Stdout, |s| s.bold()),
      row.strategy,
      row.output
    );
  }
  Ok(())
}
