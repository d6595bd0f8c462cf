//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::infrastructure::fs::home_dir;

use super::types::HostConfig;

/// Project-local config file name
pub const CONFIG_FILE_NAME: &str = "depsprobe.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {var}: expected true/false/1/0")]
    InvalidEnv { var: String, value: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(HostConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: HostConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// First existing config file: `{cwd}/depsprobe.toml`, then the user config
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let project = cwd.join(CONFIG_FILE_NAME);
    if project.is_file() {
        return Some(project);
    }

    let user = dirs_config_dir()?.join("depsprobe/config.toml");
    user.is_file().then_some(user)
}

/// Load the explicit or discovered config (defaults when none), with
/// environment overrides applied
///
/// An explicit path that cannot be read is an error; discovery failures are not.
pub fn load_or_default(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<(HostConfig, Vec<ConfigWarning>), ConfigError> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(cwd),
    };

    let (config, warnings) = match source {
        Some(path) => {
            debug!(config = %path.display(), "loading config");
            load_with_warnings(&path)?
        }
        None => {
            debug!("no config file; using defaults");
            (HostConfig::default(), Vec::new())
        }
    };

    Ok((with_env_overrides(config)?, warnings))
}

/// Apply environment variable overrides (DEPSPROBE_* prefix)
pub fn with_env_overrides(config: HostConfig) -> Result<HostConfig, ConfigError> {
    apply_env_overrides(config, |var| std::env::var(var).ok())
}

/// Apply overrides read through `lookup`
pub(crate) fn apply_env_overrides(
    mut config: HostConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<HostConfig, ConfigError> {
    let paths = &mut config.paths;
    let single_paths = [
        ("DEPSPROBE_PACKAGE_CACHE", &mut paths.package_cache),
        (
            "DEPSPROBE_SECONDARY_PACKAGE_CACHE",
            &mut paths.secondary_package_cache,
        ),
        ("DEPSPROBE_SERVICING_ROOT", &mut paths.servicing_root),
        ("DEPSPROBE_CORE_SERVICING_ROOT", &mut paths.core_servicing_root),
    ];
    for (var, slot) in single_paths {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            *slot = Some(PathBuf::from(value));
        }
    }

    // Path lists use the platform separator, like PATH.
    if let Some(value) = lookup("DEPSPROBE_PROBE_PATHS") {
        paths.additional_probes = std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }
    if let Some(value) = lookup("DEPSPROBE_INSTALL_LOCATIONS") {
        paths.install_locations = std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }

    if let Some(value) = lookup("DEPSPROBE_ROLL_FORWARD") {
        config.resolution.roll_forward = parse_bool("DEPSPROBE_ROLL_FORWARD", &value)?;
    }
    if let Some(value) = lookup("DEPSPROBE_RID").filter(|v| !v.is_empty()) {
        config.resolution.rid = Some(value);
    }
    if let Some(value) = lookup("DEPSPROBE_PLATFORM_COMPAT_PACKAGE") {
        config.resolution.platform_compat_package = value;
    }

    Ok(config)
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "paths",
        "app_dir",
        "deps_file",
        "framework_dir",
        "framework_deps_file",
        "package_cache",
        "secondary_package_cache",
        "servicing_root",
        "core_servicing_root",
        "additional_probes",
        "install_locations",
        "resolution",
        "roll_forward",
        "rid",
        "platform_compat_package",
        "requires_platform_compat_dir",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
