use std::fmt;

/// Suffixes of the per-target variables and helper rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarSuffix {
  Cflags,
  Ldflags,
  Nflags,
  OutDir,
  OutFile,
  SrcDir,
  SrcFiles,
  ObjDir,
  ObjFiles,
  ObjMkdir,
  Clean,
}

impl VarSuffix {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Cflags => "CFLAGS",
      Self::Ldflags => "LDFLAGS",
      Self::Nflags => "NFLAGS",
      Self::OutDir => "OUT_DIR",
      Self::OutFile => "OUT_FILE",
      Self::SrcDir => "SRC_DIR",
      Self::SrcFiles => "SRC_FILES",
      Self::ObjDir => "OBJ_DIR",
      Self::ObjFiles => "OBJ_FILES",
      Self::ObjMkdir => "OBJ_MKDIR",
      Self::Clean => "CLEAN",
    }
  }
}

impl fmt::Display for VarSuffix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Private variable namespace of one target: `<PREFIX>_<SUFFIX>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace<'a> {
  prefix: &'a str,
}

impl<'a> Namespace<'a> {
  pub fn new(prefix: &'a str) -> Self {
    Self { prefix }
  }

  /// Variable (or rule) name, e.g. `NASM_OUT_FILE`.
  pub fn name(&self, suffix: VarSuffix) -> String {
    format!("{}_{}", self.prefix, suffix)
  }

  /// Variable reference, e.g. `$(NASM_OUT_FILE)`.
  pub fn var(&self, suffix: VarSuffix) -> String {
    format!("$({}_{})", self.prefix, suffix)
  }
}
