//! deepmix - deep clone and deep mixin for dynamic value trees
//!
//! This crate wraps the `deepmix-core` engine with the pieces a host needs:
//! a namespace that exposes the operations under configurable identifiers,
//! layered configuration, and loading of JSON/TOML input files.

pub mod config;
pub mod input;
pub mod namespace;
pub mod output;

pub use config::{ConfigError, EffectiveConfig, Settings};
pub use deepmix_core::{
    classify, deep_clone, is_object, mixin, Callable, Error, Map, MixinExt, TypeTag, Value,
    MAX_DEPTH,
};
pub use input::{load_value, InputError};
pub use namespace::{Namespace, NamespaceError, NamespaceNames, OperationKind};
pub use output::{OutputError, OutputSettings};
