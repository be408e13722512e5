use super::{
  EmitContext, Namespace, RuleEmitter, ScriptWriter, VarSuffix, emit_final_rule_head, emit_header, emit_output_vars,
  flag_value,
};
use crate::target::{SourceBuild, Target};

/// Emits a single `$(NASM)` invocation over all sources of an
/// assembler-only target. There is no object indirection; the assembler
/// writes the output file directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblerEmitter;

impl RuleEmitter for AssemblerEmitter {
  type Input = SourceBuild;

  fn emit(&self, target: &Target, build: &SourceBuild, ctx: &EmitContext<'_>, out: &mut ScriptWriter) {
    let ns = Namespace::new(&target.prefix);
    let src_dir = ns.var(VarSuffix::SrcDir);

    emit_header(target, out);
    out.assign(
      &ns.name(VarSuffix::Nflags),
      &flag_value("NFLAGS", build.flags.nflags.as_deref()),
    );
    emit_output_vars(&ns, target, out);
    out.assign(&ns.name(VarSuffix::SrcDir), &build.src_dir);
    out.assign_list(
      &ns.name(VarSuffix::SrcFiles),
      build.sources.iter().map(|s| format!("{}/{}", src_dir, s.path)),
    );

    out.blank();
    out.line(&format!("{}:", ns.name(VarSuffix::Clean)));
    out.recipe(&format!("rm -f {}", ns.var(VarSuffix::OutFile)));

    emit_final_rule_head(target, &ns, ctx, &[ns.var(VarSuffix::SrcFiles)], out);
    out.recipe(&format!(
      "$(NASM) {} {} -o {}",
      ns.var(VarSuffix::Nflags),
      ns.var(VarSuffix::SrcFiles),
      ns.var(VarSuffix::OutFile)
    ));
  }
}
