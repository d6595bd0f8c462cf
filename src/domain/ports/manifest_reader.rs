//! ManifestReader port - abstraction for dependency manifest loading
//!
//! Lets the host load manifests without knowing the on-disk format.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::DependencyManifest;
use crate::domain::ports::FsError;

/// Result type for manifest loading
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Manifest loading errors
///
/// An absent manifest is not an error; see [`ManifestReader::read`].
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("malformed manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {path}: library key '{key}' is not 'name/version'")]
    InvalidLibraryKey { path: PathBuf, key: String },
}

/// Source of dependency manifests
pub trait ManifestReader {
    /// Load the manifest at `path`, or `Ok(None)` when there is no file
    fn read(&self, path: &Path) -> ManifestResult<Option<DependencyManifest>>;

    /// Load the manifest at `path`, standing in an empty manifest with
    /// `exists() == false` when there is no file
    fn read_or_missing(&self, path: &Path, portable: bool) -> ManifestResult<DependencyManifest> {
        Ok(self
            .read(path)?
            .unwrap_or_else(|| DependencyManifest::missing(portable)))
    }
}
