//! Per-target rule emission.
//!
//! Each [`Recipe`] variant has a [`RuleEmitter`] that renders one
//! self-contained block of make text for a target. [`emit_target`] picks the
//! emitter from the recipe and hands it the recipe payload, so an emitter
//! never sees a target of another strategy. Blocks only
//! reference variables in the target's own [`Namespace`] plus the global
//! defaults (`CFLAGS`, `LDFLAGS`, `NFLAGS`, `CC`, `NASM`, `AR`).
//!
//! # Submodules
//!
//! - [`writer`] - make syntax builder
//! - [`namespace`] - `<PREFIX>_<SUFFIX>` variable naming

mod assembler;
mod compiled;
mod custom;
pub mod namespace;
pub mod writer;

pub use assembler::AssemblerEmitter;
pub use compiled::CompiledEmitter;
pub use custom::CustomEmitter;
pub use namespace::{Namespace, VarSuffix};
pub use writer::ScriptWriter;

use tracing::debug;

use crate::registry::TargetRegistry;
use crate::script::ScriptOptions;
use crate::target::{Recipe, Target};

use writer::escape_make;

/// Read-only state shared by all emitters during one generation run.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
  pub registry: &'a TargetRegistry,
  pub options: &'a ScriptOptions,
}

/// Renders one target into a block of script text.
///
/// `Input` is the part of the [`Recipe`] the emitter works from.
pub trait RuleEmitter {
  type Input: ?Sized;

  fn emit(&self, target: &Target, input: &Self::Input, ctx: &EmitContext<'_>, out: &mut ScriptWriter);
}

/// Render `target` with the emitter matching its recipe.
pub fn emit_target(target: &Target, ctx: &EmitContext<'_>, out: &mut ScriptWriter) {
  match &target.recipe {
    Recipe::Compiled(build) => CompiledEmitter.emit(target, build, ctx, out),
    Recipe::AssemblerOnly(build) => AssemblerEmitter.emit(target, build, ctx, out),
    Recipe::CustomCommand { commands } => CustomEmitter.emit(target, commands.as_slice(), ctx, out),
  }
}

/// `$(GLOBAL)` optionally followed by the target's own flags.
fn flag_value(global: &str, extra: Option<&str>) -> String {
  match extra.map(str::trim).filter(|f| !f.is_empty()) {
    Some(flags) => format!("$({}) {}", global, flags),
    None => format!("$({})", global),
  }
}

/// Blank separator line and the description banner.
fn emit_header(target: &Target, out: &mut ScriptWriter) {
  out.blank();
  out.banner(&target.description);
}

fn emit_output_vars(ns: &Namespace<'_>, target: &Target, out: &mut ScriptWriter) {
  out.assign(&ns.name(VarSuffix::OutDir), &target.out_dir);
  out.assign(
    &ns.name(VarSuffix::OutFile),
    &format!("{}/{}", ns.var(VarSuffix::OutDir), target.out_file),
  );
}

/// Header of the final rule, the build banner, and creation of the output
/// directory. The caller appends the tool invocation.
///
/// Prerequisites are the resolved dependencies followed by `inputs`.
fn emit_final_rule_head(
  target: &Target,
  ns: &Namespace<'_>,
  ctx: &EmitContext<'_>,
  inputs: &[String],
  out: &mut ScriptWriter,
) {
  let mut goals = vec![ns.var(VarSuffix::OutFile)];
  if let Some(name) = &target.display_name {
    goals.push(name.clone());
  }

  let resolved = ctx.registry.resolve_dependencies(target);
  for external in resolved.iter().filter(|r| !r.is_target()) {
    debug!(key = %target.key, reference = %external, "external prerequisite");
  }
  let mut prerequisites: Vec<String> = resolved.iter().map(|r| r.as_str().to_string()).collect();
  prerequisites.extend(inputs.iter().cloned());

  out.blank();
  out.rule(&goals, &prerequisites);
  if ctx.options.banners {
    out.echo(&format!(
      "$(COLOR_BLUE)Building {}$(COLOR_RESET)",
      escape_make(&target.description)
    ));
  }
  out.recipe(&format!("@mkdir -p {}", ns.var(VarSuffix::OutDir)));
}
