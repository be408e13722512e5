//! Selection of the rule-generation strategy for a target.
//!
//! The choice depends only on the declared source languages and on whether
//! literal commands are present:
//!
//! 1. **Assembler-only**: every source is `.asm`.
//! 2. **Compiled**: at least one `.c` or `.s` source (`.asm` may be mixed in).
//! 3. **Custom-command**: no sources, at least one command.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use crate::target::{SourceLanguage, TargetDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
  AssemblerOnly,
  Compiled,
  CustomCommand,
}

impl Strategy {
  /// Pick the single strategy that applies to `descriptor`.
  ///
  /// Sources with unrecognized suffixes are ignored here; validation reports
  /// them before selection runs.
  pub fn select(descriptor: &TargetDescriptor) -> Result<Self, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidTarget {
      key: descriptor.label().to_string(),
      reason: reason.to_string(),
    };

    let has_sources = !descriptor.sources.is_empty();
    let has_commands = !descriptor.commands.is_empty();

    if has_sources && has_commands {
      return Err(invalid("sources and commands are mutually exclusive"));
    }

    if has_sources {
      let languages: Vec<SourceLanguage> = descriptor
        .sources
        .iter()
        .filter_map(|s| SourceLanguage::from_path(s))
        .collect();

      let all_recognized = languages.len() == descriptor.sources.len();
      if all_recognized && languages.iter().all(|l| *l == SourceLanguage::Nasm) {
        return Ok(Self::AssemblerOnly);
      }
      if languages.iter().any(|l| matches!(l, SourceLanguage::C | SourceLanguage::Assembler)) {
        return Ok(Self::Compiled);
      }
      return Err(invalid("no source file has a recognized extension"));
    }

    if has_commands {
      return Ok(Self::CustomCommand);
    }

    Err(invalid("a target needs either sources or commands"))
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::AssemblerOnly => "assembler",
      Self::Compiled => "compiled",
      Self::CustomCommand => "custom",
    }
  }
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
