//! Lua runtime for configuration files.
//!
//! # Submodules
//!
//! - [`globals`] - the `make` global table
//! - [`helpers`] - helper tables exposed under `make`
//! - [`runtime`] - VM creation and file loading

pub mod globals;
pub mod helpers;
pub mod runtime;
