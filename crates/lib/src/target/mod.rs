//! Target declarations.
//!
//! A [`TargetDescriptor`] is what the configuration step writes: a loosely
//! typed record where almost every field is optional. Registration validates
//! it once into a [`Target`], whose [`Recipe`] carries exactly the data the
//! selected strategy needs. Targets are never mutated after that.
//!
//! # Submodules
//!
//! - [`lua`] - the `make.target{}` function exposed to configurations

pub mod lua;
mod types;
mod validate;

pub use types::*;
