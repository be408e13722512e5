//! Assembly of the complete build script.
//!
//! The script is laid out as:
//!
//! 1. interpreter line and (with banners) terminal colour detection
//! 2. global variables, in declaration order
//! 3. `help`, the default goal
//! 4. `.PHONY`
//! 5. one block per target, in registry order
//! 6. `all` and `clean`
//!
//! Generation is all-or-nothing: every target is validated at registration,
//! so once a registry exists emission cannot fail and nothing is written
//! for an invalid configuration.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, GlobalVariables};
use crate::emit::writer::shell_quote;
use crate::emit::{EmitContext, Namespace, ScriptWriter, VarSuffix, emit_target};
use crate::error::GenerateError;
use crate::registry::TargetRegistry;

/// First line of every generated script.
pub const INTERPRETER_LINE: &str = "#!/usr/bin/make -f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptOptions {
  /// Print coloured progress lines from recipes.
  pub banners: bool,
}

impl Default for ScriptOptions {
  fn default() -> Self {
    Self { banners: true }
  }
}

pub struct ScriptAssembler<'a> {
  variables: &'a GlobalVariables,
  registry: &'a TargetRegistry,
  options: ScriptOptions,
}

impl<'a> ScriptAssembler<'a> {
  pub fn new(variables: &'a GlobalVariables, registry: &'a TargetRegistry, options: ScriptOptions) -> Self {
    Self {
      variables,
      registry,
      options,
    }
  }

  /// Render the whole script.
  pub fn render(&self) -> String {
    let mut out = ScriptWriter::new();

    out.line(INTERPRETER_LINE);
    out.blank();
    if self.options.banners {
      self.emit_colors(&mut out);
    }
    for (name, value) in self.variables.iter() {
      out.assign_immediate(name, value);
    }
    out.blank();

    self.emit_help(&mut out);
    self.emit_phony(&mut out);

    let ctx = EmitContext {
      registry: self.registry,
      options: &self.options,
    };
    for target in self.registry.all() {
      debug!(key = %target.key, strategy = %target.strategy(), "emitting target");
      emit_target(target, &ctx, &mut out);
    }

    self.emit_aggregates(&mut out);

    info!(targets = self.registry.len(), "script generated");
    out.finish()
  }

  /// Render and write the script to `writer`.
  pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), GenerateError> {
    writer.write_all(self.render().as_bytes())?;
    writer.flush()?;
    Ok(())
  }

  fn emit_colors(&self, out: &mut ScriptWriter) {
    out.line("INTERACTIVE := $(shell [ -t 0 ] && echo 1)");
    out.line("ifdef INTERACTIVE");
    out.line("COLOR_BLUE := \\0033[34;1m");
    out.line("COLOR_RESET := \\0033[0m");
    out.line("else");
    out.line("COLOR_BLUE := \\#\\#\\#");
    out.line("COLOR_RESET :=");
    out.line("endif");
    out.blank();
  }

  fn emit_help(&self, out: &mut ScriptWriter) {
    out.line("help:");
    out.recipe(&format!("@echo {}", shell_quote("   all")));
    out.recipe(&format!("@echo {}", shell_quote("   clean")));
    for target in self.registry.all() {
      let mut label = Namespace::new(&target.prefix).var(VarSuffix::OutFile);
      if let Some(name) = &target.display_name {
        label.push_str(&format!(" ({})", name));
      }
      out.recipe(&format!("@echo {}", shell_quote(&format!("   {}", label))));
    }
    out.blank();
  }

  fn emit_phony(&self, out: &mut ScriptWriter) {
    let mut phony = vec!["help".to_string(), "all".to_string(), "clean".to_string()];
    phony.extend(self.registry.all().iter().filter_map(|t| t.display_name.clone()));
    out.line(&format!(".PHONY: {}", phony.join(" ")));
  }

  fn emit_aggregates(&self, out: &mut ScriptWriter) {
    let outputs: Vec<String> = self
      .registry
      .all()
      .iter()
      .map(|t| Namespace::new(&t.prefix).var(VarSuffix::OutFile))
      .collect();
    out.blank();
    out.rule(&["all"], &outputs);

    // custom-command targets have no clean rule of their own
    let cleans: Vec<String> = self
      .registry
      .all()
      .iter()
      .filter(|t| t.has_clean_rule())
      .map(|t| Namespace::new(&t.prefix).name(VarSuffix::Clean))
      .collect();
    out.blank();
    out.rule(&["clean"], &cleans);
  }
}

/// Register every declaration of `config` and render the script.
///
/// Fails with the first configuration error; no text is produced in that case.
pub fn generate(config: Config, options: ScriptOptions) -> Result<String, GenerateError> {
  let (variables, registry) = config.into_registry()?;
  Ok(ScriptAssembler::new(&variables, &registry, options).render())
}

/// Like [`generate`], writing the script to `writer`.
pub fn generate_to<W: Write>(config: Config, options: ScriptOptions, writer: &mut W) -> Result<(), GenerateError> {
  let (variables, registry) = config.into_registry()?;
  ScriptAssembler::new(&variables, &registry, options).write_to(writer)
}
