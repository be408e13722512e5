//! End-to-end tests: Lua configuration in, make script out.

use makegen_lib::config::evaluate_lua_str;
use makegen_lib::error::{ConfigError, GenerateError};
use makegen_lib::script::{ScriptOptions, generate};

const OS_CONFIG: &str = r#"
make.var("NASM", "build/tools/nasm")
make.var("override CFLAGS", "$(CFLAGS) -m32")

local nasm = make.target {
  name = "nasm",
  description = "NASM x86 Assembler",
  prefix = "NASM",
  kind = "executable",
  out_dir = "build/tools",
  out_file = "nasm",
  src_dir = "src/bin/as",
  obj_dir = "build/obj/nasm",
  sources = { "nasm.c", "output/outbin.c" },
}

local libc = make.target {
  name = "libc",
  description = "Standard C Library",
  prefix = "LIBC",
  kind = "static",
  deps = { nasm },
  out_dir = "build/install/usr/lib",
  out_file = "libc.a",
  src_dir = "src/lib/libc",
  obj_dir = "build/obj/libc",
  sources = { "string.c", "setjmp.s", "math/fabs.asm" },
}

local boot = make.target {
  name = "cdemboot",
  description = "CD boot sector",
  prefix = "CDEMBOOT",
  kind = "executable",
  nflags = "-f bin",
  deps = { nasm },
  out_dir = "build/install/boot",
  out_file = "cdemboot.bin",
  src_dir = "src/sys/arch/x86/boot",
  obj_dir = "build/obj/boot",
  sources = { "cdemboot.asm" },
}

make.target {
  name = "iso",
  description = "CD image",
  prefix = "ISO",
  deps = { boot, libc },
  out_dir = "build",
  out_file = "machina.iso",
  commands = { "genisoimage -o $(ISO_OUT_FILE) build/install" },
}
"#;

fn generate_from(source: &str, options: ScriptOptions) -> Result<String, GenerateError> {
  let config = evaluate_lua_str(source, "makegen.lua").unwrap();
  generate(config, options)
}

mod script_layout {
  use super::*;

  #[test]
  fn sections_appear_in_order() {
    let text = generate_from(OS_CONFIG, ScriptOptions::default()).unwrap();
    let markers = [
      "#!/usr/bin/make -f",
      "INTERACTIVE :=",
      "NASM := build/tools/nasm",
      "help:",
      ".PHONY: help all clean nasm libc cdemboot iso",
      "# NASM x86 Assembler",
      "# Standard C Library",
      "# CD boot sector",
      "# CD image",
      "\nall: ",
      "\nclean: ",
    ];
    let positions: Vec<usize> = markers
      .iter()
      .map(|m| text.find(m).unwrap_or_else(|| panic!("missing {:?} in:\n{}", m, text)))
      .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn strategies_are_chosen_per_target() {
    let text = generate_from(OS_CONFIG, ScriptOptions { banners: false }).unwrap();

    // mixed-language library goes through objects
    assert!(text.contains("$(LIBC_OBJ_DIR)/%.o: $(LIBC_SRC_DIR)/%.asm\n"));
    assert!(text.contains("\t$(AR) rcs $(LIBC_OUT_FILE) $(LIBC_OBJ_FILES)\n"));

    // NASM-only target assembles straight to its output
    assert!(!text.contains("CDEMBOOT_OBJ_FILES"));
    assert!(text.contains("\t$(NASM) $(CDEMBOOT_NFLAGS) $(CDEMBOOT_SRC_FILES) -o $(CDEMBOOT_OUT_FILE)\n"));

    // commands are copied verbatim
    assert!(text.contains("\tgenisoimage -o $(ISO_OUT_FILE) build/install\n"));
  }

  #[test]
  fn dependencies_resolve_to_output_paths() {
    let text = generate_from(OS_CONFIG, ScriptOptions::default()).unwrap();
    assert!(text.contains("$(LIBC_OUT_FILE) libc: build/tools/nasm $(LIBC_OBJ_FILES)\n"));
    assert!(text.contains("$(ISO_OUT_FILE) iso: build/install/boot/cdemboot.bin build/install/usr/lib/libc.a\n"));
  }

  #[test]
  fn aggregates_cover_all_outputs_and_non_custom_cleans() {
    let text = generate_from(OS_CONFIG, ScriptOptions::default()).unwrap();
    assert!(text.contains("\nall: $(NASM_OUT_FILE) $(LIBC_OUT_FILE) $(CDEMBOOT_OUT_FILE) $(ISO_OUT_FILE)\n"));
    assert!(text.ends_with("\nclean: NASM_CLEAN LIBC_CLEAN CDEMBOOT_CLEAN\n"));
  }

  #[test]
  fn trailing_slash_output_dir_matches_dependents() {
    let source = r#"
      local tool = make.target {
        name = "tool",
        description = "Host tool",
        prefix = "TOOL",
        kind = "executable",
        out_dir = "build/tools/",
        out_file = "tool",
        src_dir = "utils/tool",
        obj_dir = "build/obj/tool",
        sources = { "main.c" },
      }

      make.target {
        name = "img",
        description = "Disk image",
        prefix = "IMG",
        deps = { tool },
        out_dir = "build",
        out_file = "disk.img",
        commands = { "build/tools//tool > $(IMG_OUT_FILE)" },
      }
    "#;
    let text = generate_from(source, ScriptOptions { banners: false }).unwrap();

    // $(TOOL_OUT_FILE) expands to build/tools//tool
    assert!(text.contains("TOOL_OUT_DIR = build/tools/\nTOOL_OUT_FILE = $(TOOL_OUT_DIR)/tool\n"));
    assert!(text.contains("$(IMG_OUT_FILE) img: build/tools//tool\n"));
  }

  #[test]
  fn output_is_reproducible() {
    let first = generate_from(OS_CONFIG, ScriptOptions::default()).unwrap();
    for _ in 0..5 {
      assert_eq!(first, generate_from(OS_CONFIG, ScriptOptions::default()).unwrap());
    }
  }
}

mod failures {
  use super::*;

  #[test]
  fn unsupported_extension_fails_whole_run() {
    let source = format!(
      "{}\n{}",
      OS_CONFIG,
      r#"
        make.target {
          name = "rt",
          description = "Runtime",
          prefix = "RT",
          kind = "static",
          out_dir = "build/lib",
          out_file = "librt.a",
          src_dir = "src/rt",
          obj_dir = "build/obj/rt",
          sources = { "start.cpp" },
        }
      "#
    );
    let err = generate_from(&source, ScriptOptions::default()).unwrap_err();
    assert!(matches!(
      err,
      GenerateError::Config(ConfigError::UnsupportedExtension { ref key, ref path })
        if key == "rt" && path == "start.cpp"
    ));
  }

  #[test]
  fn duplicate_key_is_rejected() {
    let source = format!(
      "{}\n{}",
      OS_CONFIG,
      r#"
        make.target {
          name = "iso",
          description = "Another image",
          prefix = "ISO2",
          out_dir = "build",
          out_file = "other.iso",
          commands = { "true" },
        }
      "#
    );
    let err = generate_from(&source, ScriptOptions::default()).unwrap_err();
    assert!(matches!(err, GenerateError::Config(ConfigError::DuplicateKey(ref key)) if key == "iso"));
  }

  #[test]
  fn sources_and_commands_together_are_invalid() {
    let source = r#"
      make.target {
        name = "both",
        description = "Both",
        prefix = "BOTH",
        kind = "executable",
        out_dir = "build",
        out_file = "both",
        src_dir = "src",
        obj_dir = "build/obj",
        sources = { "main.c" },
        commands = { "true" },
      }
    "#;
    let err = generate_from(source, ScriptOptions::default()).unwrap_err();
    assert!(matches!(err, GenerateError::Config(ConfigError::InvalidTarget { .. })));
  }
}
