//! Library Hash Value Object
//!
//! The content hash a manifest declares for a package, written as
//! `{algorithm}-{value}` (e.g. `sha512-AbC...==`).

use std::fmt;

/// A declared package hash split into algorithm and value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryHash {
    algorithm: String,
    value: String,
}

impl LibraryHash {
    /// Separator between algorithm and value
    pub const SEPARATOR: char = '-';

    /// Split a manifest hash string at the first `-`
    ///
    /// Returns `None` for strings without a separator or with an empty
    /// algorithm.
    pub fn parse(raw: &str) -> Option<Self> {
        let (algorithm, value) = raw.split_once(Self::SEPARATOR)?;
        if algorithm.is_empty() {
            return None;
        }
        Some(Self {
            algorithm: algorithm.to_string(),
            value: value.to_string(),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sidecar file name holding the expected hash for a package
    ///
    /// `{name}.{version}.nupkg.{algorithm}`
    pub fn sidecar_file_name(&self, name: &str, version: &str) -> String {
        format!("{}.{}.nupkg.{}", name, version, self.algorithm)
    }

    /// Exact byte-for-byte comparison against sidecar contents
    pub fn matches_sidecar(&self, contents: &str) -> bool {
        self.value == contents
    }
}

impl fmt::Display for LibraryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.algorithm, Self::SEPARATOR, self.value)
    }
}
