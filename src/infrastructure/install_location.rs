//! Well-known runtime install locations
//!
//! Searched for the runtime loader when no manifest or owning directory
//! provides it.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::infrastructure::fs::home_dir;

/// Environment variable naming an explicit runtime install root
pub const DOTNET_ROOT_VAR: &str = "DOTNET_ROOT";

#[cfg(windows)]
fn platform_roots(env: &dyn Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    ["ProgramFiles", "ProgramFiles(x86)"]
        .into_iter()
        .filter_map(|var| env(var))
        .map(|dir| PathBuf::from(dir).join("dotnet"))
        .collect()
}

#[cfg(target_os = "macos")]
fn platform_roots(_env: &dyn Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    vec![PathBuf::from("/usr/local/share/dotnet")]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_roots(_env: &dyn Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/share/dotnet"),
        PathBuf::from("/usr/lib/dotnet"),
        PathBuf::from("/usr/local/share/dotnet"),
    ]
}

/// Install roots in search order: `$DOTNET_ROOT`, platform roots, `~/.dotnet`
pub fn default_install_locations() -> Vec<PathBuf> {
    install_locations_with(&|key| std::env::var_os(key), home_dir())
}

fn install_locations_with(
    env: &dyn Fn(&str) -> Option<OsString>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let explicit = env(DOTNET_ROOT_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    for root in explicit
        .into_iter()
        .chain(platform_roots(env))
        .chain(home.map(|home| home.join(".dotnet")))
    {
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}
