use tracing::debug;

use super::{
  EmitContext, Namespace, RuleEmitter, ScriptWriter, VarSuffix, emit_final_rule_head, emit_header, emit_output_vars,
  flag_value,
};
use crate::target::{ArtifactKind, SourceBuild, SourceLanguage, Target};

/// Emits object-based rules for targets with `.c` or `.s` sources.
///
/// Layout of the block:
/// 1. flag, output, source and object variables
/// 2. the object directory bootstrap (`<PREFIX>_OBJ_MKDIR`), an order-only
///    prerequisite of every object
/// 3. one pattern rule per source language present
/// 4. `<PREFIX>_CLEAN`
/// 5. the link or archive rule
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledEmitter;

impl RuleEmitter for CompiledEmitter {
  type Input = SourceBuild;

  fn emit(&self, target: &Target, build: &SourceBuild, ctx: &EmitContext<'_>, out: &mut ScriptWriter) {
    let ns = Namespace::new(&target.prefix);
    let obj_dir = ns.var(VarSuffix::ObjDir);

    emit_header(target, out);

    out.assign(
      &ns.name(VarSuffix::Cflags),
      &flag_value("CFLAGS", build.flags.cflags.as_deref()),
    );
    out.assign(
      &ns.name(VarSuffix::Ldflags),
      &flag_value("LDFLAGS", build.flags.ldflags.as_deref()),
    );
    out.assign(
      &ns.name(VarSuffix::Nflags),
      &flag_value("NFLAGS", build.flags.nflags.as_deref()),
    );
    emit_output_vars(&ns, target, out);
    out.assign(&ns.name(VarSuffix::SrcDir), &build.src_dir);
    out.assign_list(&ns.name(VarSuffix::SrcFiles), build.sources.iter().map(|s| s.path.as_str()));
    out.assign(&ns.name(VarSuffix::ObjDir), &build.obj_dir);
    out.assign_list(&ns.name(VarSuffix::ObjFiles), build.object_files_under(&obj_dir));

    emit_object_dirs(build, &ns, out);

    let languages = build.languages();
    debug!(key = %target.key, ?languages, "emitting compile rules");
    for language in languages {
      emit_pattern_rule(language, &ns, ctx, out);
    }

    out.blank();
    out.line(&format!("{}:", ns.name(VarSuffix::Clean)));
    out.recipe(&format!(
      "rm -f {} {}",
      ns.var(VarSuffix::ObjFiles),
      ns.var(VarSuffix::OutFile)
    ));

    emit_final_rule_head(target, &ns, ctx, &[ns.var(VarSuffix::ObjFiles)], out);
    match build.kind {
      ArtifactKind::Static => out.recipe(&format!(
        "$(AR) rcs {} {}",
        ns.var(VarSuffix::OutFile),
        ns.var(VarSuffix::ObjFiles)
      )),
      ArtifactKind::Dynamic | ArtifactKind::Executable => out.recipe(&format!(
        "$(CC) {} {} -o {}",
        ns.var(VarSuffix::Ldflags),
        ns.var(VarSuffix::ObjFiles),
        ns.var(VarSuffix::OutFile)
      )),
    }
  }
}

/// Order-only bootstrap: the object root plus one `mkdir` per distinct
/// source subdirectory.
fn emit_object_dirs(build: &SourceBuild, ns: &Namespace<'_>, out: &mut ScriptWriter) {
  let mkdir_rule = ns.name(VarSuffix::ObjMkdir);

  out.blank();
  out.order_only_rule(&ns.var(VarSuffix::ObjFiles), &mkdir_rule);
  out.blank();
  out.line(&format!("{}:", mkdir_rule));
  out.recipe(&format!("@mkdir -p {}", ns.var(VarSuffix::ObjDir)));
  for dir in build.object_dirs_under(&ns.var(VarSuffix::ObjDir)) {
    out.recipe(&format!("@mkdir -p {}", dir));
  }
}

fn emit_pattern_rule(language: SourceLanguage, ns: &Namespace<'_>, ctx: &EmitContext<'_>, out: &mut ScriptWriter) {
  out.blank();
  out.rule(
    &[format!("{}/%.o", ns.var(VarSuffix::ObjDir))],
    &[format!("{}/%.{}", ns.var(VarSuffix::SrcDir), language.extension())],
  );
  if ctx.options.banners {
    out.echo("$(COLOR_BLUE)Compiling $<$(COLOR_RESET)");
  }
  let command = match language {
    SourceLanguage::C => format!("$(CC) {} -c $< -o $@", ns.var(VarSuffix::Cflags)),
    SourceLanguage::Assembler => format!("$(CC) -x assembler-with-cpp {} -c $< -o $@", ns.var(VarSuffix::Cflags)),
    SourceLanguage::Nasm => format!("$(NASM) {} $< -o $@", ns.var(VarSuffix::Nflags)),
  };
  out.recipe(&command);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emit::emit_target;
  use crate::registry::TargetRegistry;
  use crate::script::ScriptOptions;
  use crate::target::TargetDescriptor;

  fn render(registry: &TargetRegistry, key: &str, banners: bool) -> String {
    let options = ScriptOptions { banners };
    let ctx = EmitContext {
      registry,
      options: &options,
    };
    let mut out = ScriptWriter::new();
    emit_target(registry.get(key).unwrap(), &ctx, &mut out);
    out.finish()
  }

  fn libc(sources: &[&str]) -> TargetDescriptor {
    TargetDescriptor::new("Standard C Library", "LIBC")
      .with_name("libc")
      .with_kind(ArtifactKind::Static)
      .with_cflags("-I src/include")
      .with_deps(&["nasm", "build/tools/ar"])
      .with_output("build/install/usr/lib", "libc.a")
      .with_sources("src", "build/obj/libc", sources)
  }

  fn nasm() -> TargetDescriptor {
    TargetDescriptor::new("NASM", "NASM")
      .with_name("nasm")
      .with_kind(ArtifactKind::Executable)
      .with_output("build/tools", "nasm")
      .with_sources("src/bin/as", "build/obj/nasm", &["nasm.c"])
  }

  #[test]
  fn object_list_mirrors_sources() {
    let registry = TargetRegistry::from_descriptors(vec![libc(&["a.c", "sub/b.c"])]).unwrap();
    let text = render(&registry, "libc", false);
    assert!(text.contains("LIBC_OBJ_FILES = \\\n\t$(LIBC_OBJ_DIR)/a.o \\\n\t$(LIBC_OBJ_DIR)/sub/b.o\n"));
    assert!(text.contains("LIBC_SRC_FILES = \\\n\ta.c \\\n\tsub/b.c\n"));
  }

  #[test]
  fn bootstrap_creates_each_subdirectory_once() {
    let registry = TargetRegistry::from_descriptors(vec![libc(&[
      "lib/libc/regex/regcomp.c",
      "lib/libc/string.c",
      "lib/libc/regex/regexec.c",
      "lib/libc/math/modf.asm",
    ])])
    .unwrap();
    let text = render(&registry, "libc", false);

    assert!(text.contains("$(LIBC_OBJ_FILES): | LIBC_OBJ_MKDIR\n"));
    let mkdirs: Vec<&str> = text
      .lines()
      .skip_while(|l| *l != "LIBC_OBJ_MKDIR:")
      .skip(1)
      .take_while(|l| l.starts_with('\t'))
      .collect();
    assert_eq!(
      mkdirs,
      vec![
        "\t@mkdir -p $(LIBC_OBJ_DIR)",
        "\t@mkdir -p $(LIBC_OBJ_DIR)/lib/libc",
        "\t@mkdir -p $(LIBC_OBJ_DIR)/lib/libc/math",
        "\t@mkdir -p $(LIBC_OBJ_DIR)/lib/libc/regex",
      ]
    );
  }

  #[test]
  fn one_pattern_rule_per_language() {
    let registry = TargetRegistry::from_descriptors(vec![libc(&["a.c", "b.c", "chkstk.s", "math/fabs.asm"])]).unwrap();
    let text = render(&registry, "libc", false);

    assert_eq!(text.matches("$(LIBC_OBJ_DIR)/%.o: $(LIBC_SRC_DIR)/%.c\n").count(), 1);
    assert!(text.contains("$(LIBC_OBJ_DIR)/%.o: $(LIBC_SRC_DIR)/%.s\n\t$(CC) -x assembler-with-cpp $(LIBC_CFLAGS) -c $< -o $@\n"));
    assert!(text.contains("$(LIBC_OBJ_DIR)/%.o: $(LIBC_SRC_DIR)/%.asm\n\t$(NASM) $(LIBC_NFLAGS) $< -o $@\n"));
  }

  #[test]
  fn only_present_languages_get_rules() {
    let registry = TargetRegistry::from_descriptors(vec![nasm()]).unwrap();
    let text = render(&registry, "nasm", false);
    assert!(text.contains("%.c\n"));
    assert!(!text.contains("%.s\n"));
    assert!(!text.contains("%.asm\n"));
  }

  #[test]
  fn static_target_archives_with_resolved_dependencies() {
    let registry = TargetRegistry::from_descriptors(vec![nasm(), libc(&["a.c"])]).unwrap();
    let text = render(&registry, "libc", false);

    assert!(text.contains(
      "$(LIBC_OUT_FILE) libc: build/tools/nasm build/tools/ar $(LIBC_OBJ_FILES)\n\
       \t@mkdir -p $(LIBC_OUT_DIR)\n\
       \t$(AR) rcs $(LIBC_OUT_FILE) $(LIBC_OBJ_FILES)\n"
    ));
  }

  #[test]
  fn executable_target_links_with_ldflags() {
    let registry = TargetRegistry::from_descriptors(vec![nasm()]).unwrap();
    let text = render(&registry, "nasm", false);
    assert!(text.ends_with("\t$(CC) $(NASM_LDFLAGS) $(NASM_OBJ_FILES) -o $(NASM_OUT_FILE)\n"));
  }

  #[test]
  fn flags_are_default_plus_override() {
    let registry = TargetRegistry::from_descriptors(vec![libc(&["a.c"])]).unwrap();
    let text = render(&registry, "libc", false);
    assert!(text.contains("LIBC_CFLAGS = $(CFLAGS) -I src/include\n"));
    assert!(text.contains("LIBC_LDFLAGS = $(LDFLAGS)\n"));
    assert!(text.contains("LIBC_NFLAGS = $(NFLAGS)\n"));
    assert!(text.contains("LIBC_OUT_FILE = $(LIBC_OUT_DIR)/libc.a\n"));
  }

  #[test]
  fn clean_removes_objects_and_output() {
    let registry = TargetRegistry::from_descriptors(vec![nasm()]).unwrap();
    let text = render(&registry, "nasm", false);
    assert!(text.contains("NASM_CLEAN:\n\trm -f $(NASM_OBJ_FILES) $(NASM_OUT_FILE)\n"));
  }

  #[test]
  fn banners_echo_before_tools() {
    let registry = TargetRegistry::from_descriptors(vec![nasm()]).unwrap();
    let text = render(&registry, "nasm", true);
    assert!(text.contains("\t@printf '%b\\n' '$(COLOR_BLUE)Compiling $<$(COLOR_RESET)'\n\t$(CC) $(NASM_CFLAGS)"));
    assert!(text.contains("\t@printf '%b\\n' '$(COLOR_BLUE)Building NASM$(COLOR_RESET)'\n\t@mkdir -p $(NASM_OUT_DIR)\n"));
  }
}
