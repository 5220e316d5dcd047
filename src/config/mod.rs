//! Configuration merge system
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/deepmix/config.toml)
//! 3. Project config (.deepmix.toml)
//! 4. CLI flags
//!
//! Layers are combined with the mixin engine itself: later layers win, and
//! anything a later layer leaves out keeps its earlier value.

mod defaults;
mod effective;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_host_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, Settings,
    REPO_CONFIG_PATH,
};
