//! Global Lua values and the `make` table.
//!
//! This module registers the `make` global table which provides:
//! - `make.platform` - Platform triple (e.g., "x86_64-linux")
//! - `make.os` - Operating system name (e.g., "darwin", "linux", "windows")
//! - `make.arch` - CPU architecture (e.g., "x86_64", "aarch64")
//! - `make.dir` - Directory of the configuration file being evaluated
//! - `make.path` - Forward-slash path utilities
//! - `make.var(name, value)` - Define a global script variable
//! - `make.target{}` - Declare a target

use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;

use super::helpers;
use crate::config::Config;
use crate::platform::Platform;
use crate::target::lua::register_make_target;

/// Register the `make` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, config: Rc<RefCell<Config>>) -> LuaResult<()> {
  let make = lua.create_table()?;

  // Unknown hosts still evaluate; configurations just see nil
  if let Some(platform) = Platform::current() {
    make.set("platform", platform.triple())?;
    make.set("os", platform.os.as_str())?;
    make.set("arch", platform.arch.as_str())?;
  }

  make.set("dir", ".")?;
  make.set("path", helpers::path::create_path_helpers(lua)?)?;

  let vars = config.clone();
  let var_fn = lua.create_function(move |_, (name, value): (String, String)| {
    if name.trim().is_empty() {
      return Err(LuaError::external("make.var() requires a non-empty name"));
    }
    vars.borrow_mut().variables.set(&name, &value);
    Ok(())
  })?;
  make.set("var", var_fn)?;

  register_make_target(lua, &make, config)?;

  lua.globals().set("make", make)?;

  Ok(())
}
