//! Error types for target registration and script generation.
//!
//! Every error here is a configuration error: it is detected before any text
//! is emitted for the offending target and aborts the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems with a target declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  /// A required attribute is absent.
  #[error("the field '{field}' must be present in target '{key}'")]
  MissingField { key: String, field: &'static str },

  /// A source file uses a suffix other than `.c`, `.s` or `.asm`.
  #[error("unsupported source extension in target '{key}': {path}")]
  UnsupportedExtension { key: String, path: String },

  /// Two targets share the same key.
  #[error("duplicate target key: {0}")]
  DuplicateKey(String),

  /// Two targets share the same variable namespace.
  #[error("namespace prefix '{prefix}' of target '{key}' is already in use")]
  DuplicatePrefix { key: String, prefix: String },

  /// No rule-generation strategy applies to the target.
  #[error("invalid target '{key}': {reason}")]
  InvalidTarget { key: String, reason: String },

  /// Two sources of one target map onto the same object file.
  #[error("sources of target '{key}' collide on object file {object}")]
  ObjectCollision { key: String, object: String },
}

/// Errors raised while evaluating a configuration file.
#[derive(Debug, Error)]
pub enum EvalError {
  /// Lua evaluation error.
  #[error("lua error: {0}")]
  Lua(#[from] mlua::Error),

  /// The configuration file could not be read.
  #[error("cannot read '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Malformed JSON configuration.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The file extension names no known configuration format.
  #[error("unsupported configuration file: {}", .0.display())]
  UnsupportedConfig(PathBuf),
}

/// Errors raised while producing the final script.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// Writing the script to its output stream failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
