//! Configuration module for depsprobe
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DEPSPROBE_*)
//! 3. Config file (`--config`, `./depsprobe.toml`, `$XDG_CONFIG_HOME/depsprobe/config.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{discover_config, ConfigError, ConfigWarning, CONFIG_FILE_NAME};
pub use types::{HostConfig, PathsConfig, ResolutionConfig, DEFAULT_PLATFORM_COMPAT_PACKAGE};
