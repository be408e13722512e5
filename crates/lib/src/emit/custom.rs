use super::{EmitContext, Namespace, RuleEmitter, ScriptWriter, emit_final_rule_head, emit_header, emit_output_vars};
use crate::target::Target;

/// Emits a target built from literal commands, such as a disk image assembled
/// from other targets' outputs. No flags, no sources, no clean rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomEmitter;

impl RuleEmitter for CustomEmitter {
  type Input = [String];

  fn emit(&self, target: &Target, commands: &[String], ctx: &EmitContext<'_>, out: &mut ScriptWriter) {
    let ns = Namespace::new(&target.prefix);

    emit_header(target, out);
    emit_output_vars(&ns, target, out);

    emit_final_rule_head(target, &ns, ctx, &[], out);
    for command in commands {
      out.recipe(command);
    }
  }
}
