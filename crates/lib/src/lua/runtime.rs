use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use crate::config::Config;
use crate::lua::globals;

/// Create a Lua runtime whose `make` global records into `config`.
pub fn create_runtime(config: Rc<RefCell<Config>>) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, config)?;
  Ok(lua)
}

/// Load and execute a Lua file at the given path.
/// Sets `make.dir` to the directory of the loaded file first.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<()> {
  let canonical_path = path
    .canonicalize()
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let make = lua.globals().get::<LuaTable>("make")?;
  make.set(
    "dir",
    canonical_path
      .parent()
      .unwrap_or(Path::new(""))
      .to_string_lossy()
      .to_string(),
  )?;

  debug!(path = %canonical_path.display(), "loading configuration");
  lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .exec()
}
