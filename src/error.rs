//! Error types for depsprobe
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::ManifestError;
use crate::domain::services::ProbeConfigError;
use crate::domain::value_objects::runtime_loader_file_name;

/// Result type alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Main error type for host resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The runtime loader was in none of the manifests, owning directories
    /// or install locations
    #[error(
        "{} not found for application in {} (checked {} install locations)",
        runtime_loader_file_name(),
        .app_dir.display(),
        .install_locations.len()
    )]
    RuntimeLoaderNotFound {
        app_dir: PathBuf,
        install_locations: Vec<PathBuf>,
    },

    /// A manifest file exists but cannot be read or parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The configuration file is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A custom probe stage has contradictory flags
    #[error("invalid probe stage: {0}")]
    ProbeConfig(#[from] ProbeConfigError),
}
