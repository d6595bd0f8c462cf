//! Ordered path lists handed to the runtime host
//!
//! Each list keeps first-insertion order and rejects later entries whose
//! de-duplication key was already seen.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Separator between entries of a joined path list
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Insertion-ordered list of paths, unique by a caller-chosen key
///
/// The TPA list keys by simple assembly name; search-directory lists key by
/// real path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedUniqueList {
    paths: Vec<PathBuf>,
    keys: HashSet<String>,
}

impl OrderedUniqueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless `key` was already used. Returns whether it was added.
    pub fn insert(&mut self, key: impl Into<String>, path: PathBuf) -> bool {
        if !self.keys.insert(key.into()) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Append `path` keyed by its own string form
    pub fn insert_path(&mut self, path: PathBuf) -> bool {
        let key = path.to_string_lossy().into_owned();
        self.insert(key, path)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Join into the host's path-list format: every entry followed by
    /// [`PATH_LIST_SEPARATOR`].
    pub fn join(&self) -> String {
        let mut out = String::new();
        for path in &self.paths {
            out.push_str(&path.to_string_lossy());
            out.push(PATH_LIST_SEPARATOR);
        }
        out
    }
}

/// The three probe lists consumed by the runtime host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedProbePaths {
    /// Trusted platform assemblies
    pub tpa: String,
    /// Native library search directories
    pub native: String,
    /// Satellite resource search directories
    pub resources: String,
}
