//! makegen-lib: build-script generation for multi-language OS projects.
//!
//! Target declarations come from a configuration file and are turned into a
//! single make script:
//! - `TargetDescriptor`: one declared artifact, validated into a `Target`
//! - `TargetRegistry`: all targets in declaration order, plus dependency resolution
//! - `Strategy`: compiled, assembler-only or custom-command rule generation
//! - `ScriptAssembler`: the final script with `help`, `all` and `clean`

pub mod config;
pub mod emit;
pub mod error;
pub mod lua;
pub mod platform;
pub mod registry;
pub mod script;
pub mod strategy;
pub mod target;

pub use config::{Config, GlobalVariables, evaluate_config};
pub use error::{ConfigError, EvalError, GenerateError};
pub use registry::{Resolved, TargetRegistry};
pub use script::{ScriptAssembler, ScriptOptions, generate};
pub use strategy::Strategy;
pub use target::{ArtifactKind, Target, TargetDescriptor};
