use mlua::Lua;
use mlua::prelude::*;

/// Create the `make.path` table.
///
/// Paths in a build script always use `/`, whatever the host, so these helpers
/// work on strings instead of `std::path`.
pub fn create_path_helpers(lua: &Lua) -> LuaResult<LuaTable> {
  let path = lua.create_table()?;

  // make.path.join(...) - Join segments with a single slash
  path.set(
    "join",
    lua.create_function(|_, segments: LuaMultiValue| {
      let mut parts = Vec::new();
      for segment in segments {
        if let LuaValue::String(s) = segment {
          parts.push(s.to_str()?.to_string());
        }
      }
      Ok(join(&parts))
    })?,
  )?;

  // make.path.dirname(path) - Get parent directory
  path.set(
    "dirname",
    lua.create_function(|_, path_str: String| {
      Ok(path_str.rsplit_once('/').map(|(dir, _)| dir.to_string()).unwrap_or_default())
    })?,
  )?;

  // make.path.basename(path) - Get file name
  path.set(
    "basename",
    lua.create_function(|_, path_str: String| {
      Ok(
        path_str
          .rsplit_once('/')
          .map(|(_, name)| name.to_string())
          .unwrap_or(path_str),
      )
    })?,
  )?;

  // make.path.extname(path) - Get file extension (including the dot)
  path.set(
    "extname",
    lua.create_function(|_, path_str: String| {
      let name = path_str.rsplit('/').next().unwrap_or_default();
      Ok(
        name
          .rfind('.')
          .filter(|&i| i > 0)
          .map(|i| name[i..].to_string())
          .unwrap_or_default(),
      )
    })?,
  )?;

  Ok(path)
}

fn join(parts: &[String]) -> String {
  let mut result = String::new();
  for part in parts.iter().filter(|p| !p.is_empty()) {
    if part.starts_with('/') || result.is_empty() {
      result = part.trim_end_matches('/').to_string();
      if result.is_empty() {
        result.push('/');
      }
    } else {
      if !result.ends_with('/') {
        result.push('/');
      }
      result.push_str(part.trim_matches('/'));
    }
  }
  result
}
