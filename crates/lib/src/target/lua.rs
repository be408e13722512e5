//! Lua binding for `make.target{}`.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::LuaSerdeExt;
use mlua::prelude::*;
use tracing::debug;

use crate::config::Config;
use crate::target::TargetDescriptor;

/// Register the `make.target` function on the make table.
///
/// The function deserializes its table argument into a [`TargetDescriptor`],
/// appends it to the configuration, and returns the target's key (or nil when
/// the declaration has neither `name` nor `out_file`) so the result can be
/// used directly in another target's `deps`.
///
/// Validation is deferred to registration; only the shape of the table is
/// checked here.
pub fn register_make_target(lua: &Lua, make_table: &LuaTable, config: Rc<RefCell<Config>>) -> LuaResult<()> {
  let target_fn = lua.create_function(move |lua, spec: LuaTable| {
    let descriptor: TargetDescriptor = lua
      .from_value(LuaValue::Table(spec))
      .map_err(|e| LuaError::external(format!("invalid target declaration: {}", e)))?;

    let key = descriptor.key().map(str::to_string);
    debug!(target = descriptor.label(), "declared target");
    config.borrow_mut().targets.push(descriptor);
    Ok(key)
  })?;
  make_table.set("target", target_fn)?;
  Ok(())
}
