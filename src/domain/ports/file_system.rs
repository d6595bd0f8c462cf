//! FileSystem port - abstraction over the read-only queries probing needs
//!
//! Probing only ever asks four things of the disk: does a file or directory
//! exist, what does a small file contain, what is in a directory, and
//! where does a path really point. Keeping those behind a trait lets tests
//! count directory listings and lets the domain layer stay I/O-agnostic.

use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Attach the offending path to an I/O error
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Abstract read-only file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - counting/mocking wrappers in tests
pub trait FileSystem {
    /// Check if a regular file exists
    fn file_exists(&self, path: &Path) -> bool;

    /// Check if a directory exists
    fn dir_exists(&self, path: &Path) -> bool;

    /// Read file content as string
    fn read_to_string(&self, path: &Path) -> FsResult<String>;

    /// List the entries of a directory, sorted by name
    fn list_dir(&self, dir: &Path) -> FsResult<Vec<DirEntryInfo>>;

    /// Resolve symlinks; falls back to the input when resolution fails
    fn real_path(&self, path: &Path) -> PathBuf;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn file_exists(&self, path: &Path) -> bool {
        (**self).file_exists(path)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        (**self).dir_exists(path)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        (**self).read_to_string(path)
    }

    fn list_dir(&self, dir: &Path) -> FsResult<Vec<DirEntryInfo>> {
        (**self).list_dir(dir)
    }

    fn real_path(&self, path: &Path) -> PathBuf {
        (**self).real_path(path)
    }
}
