use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Strategy;

/// Suffix of every intermediate object file.
pub const OBJECT_EXTENSION: &str = "o";

/// What the final rule of a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
  /// Archive built with `$(AR)`.
  Static,
  /// Shared object linked with `$(CC)`.
  Dynamic,
  /// Executable linked with `$(CC)`.
  Executable,
}

impl ArtifactKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Static => "static",
      Self::Dynamic => "dynamic",
      Self::Executable => "executable",
    }
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// The three recognized source languages.
///
/// The derived ordering is the order in which pattern rules are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
  /// `.c`, compiled with `$(CC)`.
  C,
  /// `.s`, preprocessed and assembled by `$(CC) -x assembler-with-cpp`.
  Assembler,
  /// `.asm`, assembled by `$(NASM)`.
  Nasm,
}

impl SourceLanguage {
  pub const ALL: [SourceLanguage; 3] = [Self::C, Self::Assembler, Self::Nasm];

  /// File suffix without the leading dot.
  pub fn extension(&self) -> &'static str {
    match self {
      Self::C => "c",
      Self::Assembler => "s",
      Self::Nasm => "asm",
    }
  }

  /// Detect the language of a source path from its suffix.
  pub fn from_path(path: &str) -> Option<Self> {
    let (_, ext) = path.rsplit_once('.')?;
    Self::ALL.into_iter().find(|lang| lang.extension() == ext)
  }
}

/// One entry of a target's source list with its detected language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
  /// Path relative to the target's source directory.
  pub path: String,
  pub language: SourceLanguage,
}

impl SourceFile {
  /// Parse a relative source path, rejecting unknown suffixes.
  pub fn parse(key: &str, path: &str) -> Result<Self, ConfigError> {
    let language = SourceLanguage::from_path(path).ok_or_else(|| ConfigError::UnsupportedExtension {
      key: key.to_string(),
      path: path.to_string(),
    })?;
    Ok(Self {
      path: path.to_string(),
      language,
    })
  }

  /// The same relative path with the source suffix replaced by `.o`.
  pub fn object_path(&self) -> String {
    let stem = &self.path[..self.path.len() - self.language.extension().len()];
    format!("{}{}", stem, OBJECT_EXTENSION)
  }

  /// Directory part of the relative path, if the source lives in a subdirectory.
  pub fn parent(&self) -> Option<&str> {
    self.path.rsplit_once('/').map(|(dir, _)| dir).filter(|dir| !dir.is_empty())
  }
}

/// A target as written by the configuration step.
///
/// Every field is optional here; [`TargetDescriptor::validate`] checks which
/// ones the selected strategy actually requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDescriptor {
  /// Invokable rule name, also the registry key when present.
  pub name: Option<String>,
  pub description: Option<String>,
  /// Namespace of all generated variables of this target.
  pub prefix: Option<String>,
  pub kind: Option<ArtifactKind>,
  pub cflags: Option<String>,
  pub ldflags: Option<String>,
  pub nflags: Option<String>,
  pub out_dir: Option<String>,
  pub out_file: Option<String>,
  pub src_dir: Option<String>,
  pub obj_dir: Option<String>,
  #[serde(default)]
  pub sources: Vec<String>,
  /// Keys of other targets, or literal paths passed through verbatim.
  #[serde(default)]
  pub deps: Vec<String>,
  /// Literal recipe lines of a custom-command target.
  #[serde(default)]
  pub commands: Vec<String>,
}

impl TargetDescriptor {
  pub fn new(description: &str, prefix: &str) -> Self {
    Self {
      description: Some(description.to_string()),
      prefix: Some(prefix.to_string()),
      ..Self::default()
    }
  }

  pub fn with_name(mut self, name: &str) -> Self {
    self.name = Some(name.to_string());
    self
  }

  pub fn with_kind(mut self, kind: ArtifactKind) -> Self {
    self.kind = Some(kind);
    self
  }

  pub fn with_output(mut self, dir: &str, file: &str) -> Self {
    self.out_dir = Some(dir.to_string());
    self.out_file = Some(file.to_string());
    self
  }

  pub fn with_sources<S: AsRef<str>>(mut self, src_dir: &str, obj_dir: &str, sources: &[S]) -> Self {
    self.src_dir = Some(src_dir.to_string());
    self.obj_dir = Some(obj_dir.to_string());
    self.sources = sources.iter().map(|s| s.as_ref().to_string()).collect();
    self
  }

  pub fn with_cflags(mut self, flags: &str) -> Self {
    self.cflags = Some(flags.to_string());
    self
  }

  pub fn with_ldflags(mut self, flags: &str) -> Self {
    self.ldflags = Some(flags.to_string());
    self
  }

  pub fn with_nflags(mut self, flags: &str) -> Self {
    self.nflags = Some(flags.to_string());
    self
  }

  pub fn with_deps<S: AsRef<str>>(mut self, deps: &[S]) -> Self {
    self.deps = deps.iter().map(|s| s.as_ref().to_string()).collect();
    self
  }

  pub fn with_commands<S: AsRef<str>>(mut self, commands: &[S]) -> Self {
    self.commands = commands.iter().map(|s| s.as_ref().to_string()).collect();
    self
  }

  /// Registry key: the explicit name, else the output file name.
  pub fn key(&self) -> Option<&str> {
    self.name.as_deref().or(self.out_file.as_deref())
  }

  /// Best available identity for error messages.
  pub fn label(&self) -> &str {
    self
      .key()
      .filter(|k| !k.trim().is_empty())
      .or(self.prefix.as_deref())
      .unwrap_or("<unnamed>")
  }
}

/// Per-target flag overrides, appended to the global defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
  pub cflags: Option<String>,
  pub ldflags: Option<String>,
  pub nflags: Option<String>,
}

/// Everything a source-driven strategy needs to emit its rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBuild {
  pub kind: ArtifactKind,
  pub flags: Flags,
  pub src_dir: String,
  pub obj_dir: String,
  pub sources: Vec<SourceFile>,
}

impl SourceBuild {
  /// Distinct languages present in the source list.
  pub fn languages(&self) -> BTreeSet<SourceLanguage> {
    self.sources.iter().map(|s| s.language).collect()
  }

  /// Object file paths rooted under `root`, one per source, in source order.
  pub fn object_files_under(&self, root: &str) -> Vec<String> {
    self
      .sources
      .iter()
      .map(|s| format!("{}/{}", root, s.object_path()))
      .collect()
  }

  /// Subdirectories of `root` that must exist before any object is written.
  ///
  /// One entry per distinct parent path of the sources; sources at the top
  /// level contribute nothing.
  pub fn object_dirs_under(&self, root: &str) -> BTreeSet<String> {
    self
      .sources
      .iter()
      .filter_map(SourceFile::parent)
      .map(|dir| format!("{}/{}", root, dir))
      .collect()
  }
}

/// How a validated target is turned into rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Recipe {
  /// Per-source objects, then one link or archive step.
  Compiled(SourceBuild),
  /// One assembler invocation over all sources, no objects.
  AssemblerOnly(SourceBuild),
  /// Literal commands run after the dependencies are built.
  CustomCommand { commands: Vec<String> },
}

/// A registered target. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
  pub key: String,
  pub display_name: Option<String>,
  pub prefix: String,
  pub description: String,
  pub out_dir: String,
  pub out_file: String,
  pub dependencies: Vec<String>,
  pub recipe: Recipe,
}

impl Target {
  pub fn strategy(&self) -> Strategy {
    match self.recipe {
      Recipe::Compiled(_) => Strategy::Compiled,
      Recipe::AssemblerOnly(_) => Strategy::AssemblerOnly,
      Recipe::CustomCommand { .. } => Strategy::CustomCommand,
    }
  }

  /// Canonical output path: `out_dir`, `/`, `out_file`.
  ///
  /// Must expand to the same text as the target's `<PREFIX>_OUT_FILE`
  /// variable, since make compares prerequisites as plain strings.
  pub fn output_path(&self) -> String {
    format!("{}/{}", self.out_dir, self.out_file)
  }

  /// Whether the target contributes a `<PREFIX>_CLEAN` rule.
  pub fn has_clean_rule(&self) -> bool {
    !matches!(self.recipe, Recipe::CustomCommand { .. })
  }
}
