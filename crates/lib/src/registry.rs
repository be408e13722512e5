//! The target registry.
//!
//! Holds every validated [`Target`] keyed by its stable identifier, in
//! insertion order. Iteration order is part of the output contract: the
//! `help`, `.PHONY`, `all` and `clean` aggregates and the order of the target
//! blocks all follow it, so generating twice yields identical scripts.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::target::{Target, TargetDescriptor};

/// Outcome of resolving a dependency reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
  /// The reference named a registered target; this is its output path.
  Target(String),
  /// Not a registered key; passed through verbatim.
  Literal(&'a str),
}

impl Resolved<'_> {
  pub fn as_str(&self) -> &str {
    match self {
      Resolved::Target(path) => path,
      Resolved::Literal(s) => s,
    }
  }

  pub fn is_target(&self) -> bool {
    matches!(self, Resolved::Target(_))
  }
}

impl fmt::Display for Resolved<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Default)]
pub struct TargetRegistry {
  targets: Vec<Target>,
  by_key: HashMap<String, usize>,
  /// prefix -> key of the target owning it
  prefixes: HashMap<String, String>,
}

impl TargetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register every descriptor in order, stopping at the first error.
  pub fn from_descriptors<I>(descriptors: I) -> Result<Self, ConfigError>
  where
    I: IntoIterator<Item = TargetDescriptor>,
  {
    let mut registry = Self::new();
    for descriptor in descriptors {
      registry.register(descriptor)?;
    }
    Ok(registry)
  }

  /// Validate `descriptor` and insert it under its key.
  ///
  /// # Errors
  ///
  /// Any validation error of the descriptor, `DuplicateKey` if the key is
  /// taken, `DuplicatePrefix` if another target uses the same namespace.
  pub fn register(&mut self, descriptor: TargetDescriptor) -> Result<&Target, ConfigError> {
    let target = descriptor.validate()?;

    if self.by_key.contains_key(&target.key) {
      return Err(ConfigError::DuplicateKey(target.key));
    }
    if self.prefixes.contains_key(&target.prefix) {
      return Err(ConfigError::DuplicatePrefix {
        key: target.key,
        prefix: target.prefix,
      });
    }

    debug!(
      key = %target.key,
      prefix = %target.prefix,
      strategy = %target.strategy(),
      "registered target"
    );

    let index = self.targets.len();
    self.by_key.insert(target.key.clone(), index);
    self.prefixes.insert(target.prefix.clone(), target.key.clone());
    self.targets.push(target);
    Ok(&self.targets[index])
  }

  pub fn get(&self, key: &str) -> Option<&Target> {
    self.by_key.get(key).map(|&i| &self.targets[i])
  }

  /// Resolve a dependency reference.
  ///
  /// A registered key becomes that target's output path; anything else is
  /// an external path or tool and passes through unchanged.
  pub fn resolve<'a>(&self, reference: &'a str) -> Resolved<'a> {
    match self.get(reference) {
      Some(target) => Resolved::Target(target.output_path()),
      None => Resolved::Literal(reference),
    }
  }

  /// Resolve every dependency of `target`, preserving order.
  pub fn resolve_dependencies<'a>(&self, target: &'a Target) -> Vec<Resolved<'a>> {
    target.dependencies.iter().map(|d| self.resolve(d)).collect()
  }

  /// All targets in registration order.
  pub fn all(&self) -> &[Target] {
    &self.targets
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::target::ArtifactKind;

  fn tool(name: &str, prefix: &str) -> TargetDescriptor {
    TargetDescriptor::new(name, prefix)
      .with_name(name)
      .with_kind(ArtifactKind::Executable)
      .with_output("build/tools", name)
      .with_sources("src", &format!("build/obj/{}", name), &["main.c"])
  }

  fn image(name: &str, prefix: &str, deps: &[&str]) -> TargetDescriptor {
    TargetDescriptor::new(name, prefix)
      .with_name(name)
      .with_output("build", &format!("{}.img", name))
      .with_deps(deps)
      .with_commands(&["true"])
  }

  mod register {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
      let registry = TargetRegistry::from_descriptors(vec![
        tool("zeta", "ZETA"),
        tool("alpha", "ALPHA"),
        tool("mid", "MID"),
      ])
      .unwrap();
      let keys: Vec<_> = registry.all().iter().map(|t| t.key.as_str()).collect();
      assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_key_is_rejected() {
      let mut registry = TargetRegistry::new();
      registry.register(tool("nasm", "NASM")).unwrap();
      let err = registry.register(tool("nasm", "NASM2")).unwrap_err();
      assert_eq!(err, ConfigError::DuplicateKey("nasm".to_string()));
      assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
      let mut registry = TargetRegistry::new();
      registry.register(tool("nasm", "TOOL")).unwrap();
      let err = registry.register(tool("mkdfs", "TOOL")).unwrap_err();
      assert_eq!(
        err,
        ConfigError::DuplicatePrefix {
          key: "mkdfs".to_string(),
          prefix: "TOOL".to_string(),
        }
      );
    }

    #[test]
    fn first_invalid_descriptor_aborts() {
      let mut broken = tool("second", "SECOND");
      broken.out_file = None;
      broken.name = Some("second".to_string());

      let err = TargetRegistry::from_descriptors(vec![tool("first", "FIRST"), broken, tool("third", "THIRD")])
        .unwrap_err();
      assert_eq!(
        err,
        ConfigError::MissingField {
          key: "second".to_string(),
          field: "out_file",
        }
      );
    }
  }

  mod resolve {
    use super::*;

    #[test]
    fn registered_key_resolves_to_output_path() {
      let registry = TargetRegistry::from_descriptors(vec![tool("nasm", "NASM")]).unwrap();
      let resolved = registry.resolve("nasm");
      assert_eq!(resolved, Resolved::Target("build/tools/nasm".to_string()));
      assert!(resolved.is_target());
    }

    #[test]
    fn unregistered_reference_is_identity() {
      let registry = TargetRegistry::from_descriptors(vec![tool("nasm", "NASM")]).unwrap();
      for reference in ["build/tools/ar", "genisoimage", "", "NASM"] {
        let resolved = registry.resolve(reference);
        assert_eq!(resolved, Resolved::Literal(reference));
        assert_eq!(resolved.as_str(), reference);
      }
    }

    #[test]
    fn dependencies_resolve_in_order() {
      let registry = TargetRegistry::from_descriptors(vec![
        tool("nasm", "NASM"),
        tool("mkdfs", "MKDFS"),
        image("iso", "ISO", &["mkdfs", "build/install/boot/kernel32.so", "nasm"]),
      ])
      .unwrap();
      let iso = registry.get("iso").unwrap();
      let deps: Vec<String> = registry
        .resolve_dependencies(iso)
        .iter()
        .map(|r| r.to_string())
        .collect();
      assert_eq!(
        deps,
        vec!["build/tools/mkdfs", "build/install/boot/kernel32.so", "build/tools/nasm"]
      );
    }

    #[test]
    fn forward_references_resolve_after_registration() {
      let registry =
        TargetRegistry::from_descriptors(vec![image("iso", "ISO", &["nasm"]), tool("nasm", "NASM")]).unwrap();
      let iso = registry.get("iso").unwrap();
      assert!(registry.resolve_dependencies(iso)[0].is_target());
    }
  }
}
