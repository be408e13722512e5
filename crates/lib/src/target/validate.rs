//! Validation of raw target declarations.

use std::collections::HashSet;

use tracing::warn;

use super::types::{Flags, Recipe, SourceBuild, SourceFile, Target, TargetDescriptor};
use crate::error::ConfigError;
use crate::strategy::Strategy;

impl TargetDescriptor {
  /// Check the declaration and turn it into an immutable [`Target`].
  ///
  /// Fields are checked in a fixed order so that the first problem reported
  /// is deterministic: identity and output fields first, then extensions,
  /// then strategy selection, then the fields the strategy needs.
  pub fn validate(self) -> Result<Target, ConfigError> {
    let label = self.label().to_string();
    let missing = |field: &'static str| ConfigError::MissingField {
      key: label.clone(),
      field,
    };

    let out_dir = self.out_dir.clone().ok_or_else(|| missing("out_dir"))?;
    let out_file = self.out_file.clone().ok_or_else(|| missing("out_file"))?;
    let description = self.description.clone().ok_or_else(|| missing("description"))?;
    let prefix = self
      .prefix
      .clone()
      .filter(|p| !p.trim().is_empty())
      .ok_or_else(|| missing("prefix"))?;
    if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      return Err(missing("name"));
    }
    let key = self.key().unwrap_or(&out_file).to_string();

    let invalid = |reason: String| ConfigError::InvalidTarget {
      key: key.clone(),
      reason,
    };
    if !is_variable_name(&prefix) {
      return Err(invalid(format!("prefix '{}' is not a valid variable name", prefix)));
    }
    if let Some(name) = self.name.as_deref().filter(|n| !is_goal_name(n)) {
      return Err(invalid(format!("name '{}' cannot be used as a make goal", name)));
    }
    if is_multiline(&description) {
      return Err(invalid("description must be a single line".to_string()));
    }
    if let Some(index) = self.commands.iter().position(|c| is_multiline(c)) {
      return Err(invalid(format!("command {} must be a single line", index + 1)));
    }

    let sources = self
      .sources
      .iter()
      .map(|path| SourceFile::parse(&key, path))
      .collect::<Result<Vec<_>, _>>()?;

    let recipe = match Strategy::select(&self)? {
      Strategy::CustomCommand => {
        if self.cflags.is_some() || self.ldflags.is_some() || self.nflags.is_some() {
          warn!(key = %key, "flags are ignored for custom-command targets");
        }
        Recipe::CustomCommand {
          commands: self.commands,
        }
      }
      strategy => {
        let build = SourceBuild {
          kind: self.kind.ok_or_else(|| missing("kind"))?,
          flags: Flags {
            cflags: self.cflags,
            ldflags: self.ldflags,
            nflags: self.nflags,
          },
          src_dir: self.src_dir.ok_or_else(|| missing("src_dir"))?,
          obj_dir: self.obj_dir.ok_or_else(|| missing("obj_dir"))?,
          sources,
        };
        if strategy == Strategy::Compiled {
          check_object_collisions(&key, &build)?;
          Recipe::Compiled(build)
        } else {
          Recipe::AssemblerOnly(build)
        }
      }
    };

    Ok(Target {
      key,
      display_name: self.name,
      prefix,
      description,
      out_dir,
      out_file,
      dependencies: self.deps,
      recipe,
    })
  }
}

/// Letters, digits and `_`: safe in `<PREFIX>_<SUFFIX>` variable names.
fn is_variable_name(prefix: &str) -> bool {
  prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rejects whitespace and the characters make treats specially in a rule line.
fn is_goal_name(name: &str) -> bool {
  !name
    .chars()
    .any(|c| c.is_whitespace() || matches!(c, ':' | '#' | '=' | '$' | '%' | ';' | '|'))
}

fn is_multiline(text: &str) -> bool {
  text.contains(['\n', '\r'])
}

fn check_object_collisions(key: &str, build: &SourceBuild) -> Result<(), ConfigError> {
  let mut seen = HashSet::new();
  for source in &build.sources {
    let object = source.object_path();
    if !seen.insert(object.clone()) {
      return Err(ConfigError::ObjectCollision {
        key: key.to_string(),
        object,
      });
    }
  }
  Ok(())
}
