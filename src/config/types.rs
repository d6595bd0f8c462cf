//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::services::ResolverOptions;
use crate::domain::value_objects::host_rid;
use crate::infrastructure::default_install_locations;

use super::loader::{self, ConfigError, ConfigWarning};

/// Package whose native and resource directory is placed right after the
/// application directory
pub const DEFAULT_PLATFORM_COMPAT_PACKAGE: &str = "Microsoft.Private.CoreFx.NETCoreApp";

/// `[paths]` section: where the host looks for things
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    #[serde(default)]
    pub app_dir: Option<PathBuf>,

    /// Application manifest; defaults to `{app_dir}/{app name}.deps.json`
    #[serde(default)]
    pub deps_file: Option<PathBuf>,

    #[serde(default)]
    pub framework_dir: Option<PathBuf>,

    /// Framework manifest; defaults to `{framework_dir}/Microsoft.NETCore.App.deps.json`
    #[serde(default)]
    pub framework_deps_file: Option<PathBuf>,

    #[serde(default)]
    pub package_cache: Option<PathBuf>,

    #[serde(default)]
    pub secondary_package_cache: Option<PathBuf>,

    #[serde(default)]
    pub servicing_root: Option<PathBuf>,

    #[serde(default)]
    pub core_servicing_root: Option<PathBuf>,

    #[serde(default)]
    pub additional_probes: Vec<PathBuf>,

    /// Runtime install roots; empty means the platform defaults
    #[serde(default)]
    pub install_locations: Vec<PathBuf>,
}

/// `[resolution]` section: matching policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default = "default_true")]
    pub roll_forward: bool,

    /// Runtime identifier for `runtimeTargets` selection; host RID if unset
    #[serde(default)]
    pub rid: Option<String>,

    /// Empty disables the compat directory placement
    #[serde(default = "default_platform_compat_package")]
    pub platform_compat_package: String,

    #[serde(default = "default_requires_platform_compat_dir")]
    pub requires_platform_compat_dir: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            roll_forward: true,
            rid: None,
            platform_compat_package: default_platform_compat_package(),
            requires_platform_compat_dir: default_requires_platform_compat_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_platform_compat_package() -> String {
    DEFAULT_PLATFORM_COMPAT_PACKAGE.to_string()
}

fn default_requires_platform_compat_dir() -> bool {
    cfg!(windows)
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl HostConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Load the explicit file, a discovered file, or defaults; then apply
    /// environment overrides
    pub fn load_or_default(
        explicit: Option<&Path>,
        cwd: &Path,
    ) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_or_default(explicit, cwd)
    }

    /// Apply environment variable overrides (DEPSPROBE_* prefix)
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        loader::with_env_overrides(self)
    }

    /// Runtime identifier used for asset selection
    pub fn rid(&self) -> String {
        self.resolution.rid.clone().unwrap_or_else(host_rid)
    }

    /// Resolver inputs for an application in `app_dir`
    pub fn resolver_options(&self, app_dir: impl Into<PathBuf>) -> ResolverOptions {
        let paths = &self.paths;
        let resolution = &self.resolution;

        let install_locations = if paths.install_locations.is_empty() {
            default_install_locations()
        } else {
            paths.install_locations.clone()
        };

        let mut options = ResolverOptions::new(app_dir)
            .with_additional_probes(paths.additional_probes.clone())
            .with_install_locations(install_locations)
            .with_roll_forward(resolution.roll_forward)
            .with_requires_platform_compat_dir(resolution.requires_platform_compat_dir);

        if let Some(dir) = &paths.framework_dir {
            options = options.with_fx_dir(dir);
        }
        if let Some(dir) = &paths.package_cache {
            options = options.with_package_cache(dir);
        }
        if let Some(dir) = &paths.secondary_package_cache {
            options = options.with_secondary_package_cache(dir);
        }
        if let Some(dir) = &paths.servicing_root {
            options = options.with_servicing_root(dir);
        }
        if let Some(dir) = &paths.core_servicing_root {
            options = options.with_core_servicing_root(dir);
        }
        if !resolution.platform_compat_package.is_empty() {
            options = options.with_platform_compat_package(&resolution.platform_compat_package);
        }
        options
    }
}
