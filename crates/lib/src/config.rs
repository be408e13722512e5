//! Configuration evaluation.
//!
//! A configuration is either a Lua file that calls `make.var()` and
//! `make.target{}`, or a JSON document with the same content. Evaluating it
//! produces a [`Config`]: the ordered global variables and the target
//! declarations in the order they were written.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, EvalError};
use crate::lua::runtime;
use crate::registry::TargetRegistry;
use crate::target::TargetDescriptor;

/// Global script variables in declaration order.
///
/// Emitted as `NAME := value` lines at the top of the script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalVariables(Vec<(String, String)>);

impl GlobalVariables {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set a variable. Redefining a name keeps its original position.
  pub fn set(&mut self, name: &str, value: &str) {
    match self.0.iter_mut().find(|(n, _)| n == name) {
      Some((_, v)) => *v = value.to_string(),
      None => self.0.push((name.to_string(), value.to_string())),
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// The evaluated configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default)]
  pub variables: GlobalVariables,
  #[serde(default)]
  pub targets: Vec<TargetDescriptor>,
}

impl Config {
  /// Register every declaration, stopping at the first invalid one.
  pub fn into_registry(self) -> Result<(GlobalVariables, TargetRegistry), ConfigError> {
    let registry = TargetRegistry::from_descriptors(self.targets)?;
    Ok((self.variables, registry))
  }
}

/// Evaluate a configuration file, choosing the format from its extension.
///
/// `.lua` files are run in a fresh Lua runtime; `.json` files are parsed
/// directly.
pub fn evaluate_config(path: &Path) -> Result<Config, EvalError> {
  let config = match path.extension().and_then(|e| e.to_str()) {
    Some("lua") => evaluate_lua(path)?,
    Some("json") => load_json(path)?,
    _ => return Err(EvalError::UnsupportedConfig(path.to_path_buf())),
  };

  info!(
    path = %path.display(),
    targets = config.targets.len(),
    variables = config.variables.len(),
    "configuration evaluated"
  );
  Ok(config)
}

/// Run a Lua configuration file and collect what it declared.
pub fn evaluate_lua(path: &Path) -> Result<Config, EvalError> {
  let config = Rc::new(RefCell::new(Config::default()));

  // lua must be dropped before the Rc can be unwrapped
  {
    let lua = runtime::create_runtime(config.clone())?;
    runtime::load_file(&lua, path)?;
  }

  Ok(Rc::try_unwrap(config).map(RefCell::into_inner).unwrap_or_else(|rc| rc.borrow().clone()))
}

/// Evaluate Lua source held in memory. Relative paths resolve against the
/// current directory.
pub fn evaluate_lua_str(source: &str, chunk_name: &str) -> Result<Config, EvalError> {
  let config = Rc::new(RefCell::new(Config::default()));

  {
    let lua = runtime::create_runtime(config.clone())?;
    lua.load(source).set_name(chunk_name).exec()?;
  }

  Ok(Rc::try_unwrap(config).map(RefCell::into_inner).unwrap_or_else(|rc| rc.borrow().clone()))
}

/// Parse a JSON configuration file.
pub fn load_json(path: &Path) -> Result<Config, EvalError> {
  let content = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let config: Config = serde_json::from_str(&content)?;
  debug!(path = %path.display(), "parsed json configuration");
  Ok(config)
}
