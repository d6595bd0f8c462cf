//! Dependency entry entity
//!
//! One artifact named by a dependency manifest, plus the helpers that map it
//! onto the on-disk layouts a probe location may use.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{AssetKind, LibraryHash};

/// Library type whose entries may be redirected by servicing
pub const PACKAGE_LIBRARY_TYPE: &str = "package";

/// Extensions recognised as managed assemblies, in priority order
pub const MANAGED_EXTENSIONS: [&str; 4] = [".ni.dll", ".dll", ".ni.exe", ".exe"];

/// One artifact described by a manifest
///
/// Ordinary entries live at `{root}/{library_name}/{library_version}/{relative_path}`;
/// rid-specific entries live at `{root}/{relative_path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    library_type: String,
    library_name: String,
    library_version: String,
    library_hash: String,
    asset_kind: AssetKind,
    asset_name: String,
    relative_path: String,
    is_serviceable: bool,
    is_rid_specific: bool,
}

impl DependencyEntry {
    /// Create a package entry; the asset name is derived from the file name
    pub fn new(
        asset_kind: AssetKind,
        library_name: impl Into<String>,
        library_version: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Self {
        let relative_path = relative_path.into();
        let asset_name = simple_name(file_name_of(&relative_path)).to_string();
        Self {
            library_type: PACKAGE_LIBRARY_TYPE.to_string(),
            library_name: library_name.into(),
            library_version: library_version.into(),
            library_hash: String::new(),
            asset_kind,
            asset_name,
            relative_path,
            is_serviceable: false,
            is_rid_specific: false,
        }
    }

    pub fn with_library_type(mut self, library_type: impl Into<String>) -> Self {
        self.library_type = library_type.into();
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.library_hash = hash.into();
        self
    }

    pub fn with_serviceable(mut self, serviceable: bool) -> Self {
        self.is_serviceable = serviceable;
        self
    }

    pub fn with_rid_specific(mut self, rid_specific: bool) -> Self {
        self.is_rid_specific = rid_specific;
        self
    }

    pub fn library_type(&self) -> &str {
        &self.library_type
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    pub fn library_hash(&self) -> &str {
        &self.library_hash
    }

    pub fn asset_kind(&self) -> AssetKind {
        self.asset_kind
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    /// Relative path as written in the manifest (forward slashes)
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_serviceable(&self) -> bool {
        self.is_serviceable
    }

    pub fn is_rid_specific(&self) -> bool {
        self.is_rid_specific
    }

    pub fn is_package(&self) -> bool {
        self.library_type.eq_ignore_ascii_case(PACKAGE_LIBRARY_TYPE)
    }

    /// File name component of the relative path
    pub fn file_name(&self) -> &str {
        file_name_of(&self.relative_path)
    }

    /// Relative path with `/` replaced by the platform separator
    pub fn normalized_relative_path(&self) -> PathBuf {
        normalize_relative(&self.relative_path)
    }

    /// `base/name/version/relative`, if that file exists
    pub fn to_full_path(&self, base: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
        self.to_versioned_path(base, &self.library_version, fs)
    }

    /// Like [`Self::to_full_path`] but under a substituted version directory
    pub fn to_roll_forward_path(
        &self,
        base: &Path,
        version: &str,
        fs: &impl FileSystem,
    ) -> Option<PathBuf> {
        self.to_versioned_path(base, version, fs)
    }

    /// `base/relative`, if that file exists
    pub fn to_rel_path(&self, base: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
        if base.as_os_str().is_empty() {
            return None;
        }
        existing(base.join(self.normalized_relative_path()), fs)
    }

    /// `base/{file name}`, if that file exists (flat framework layout)
    pub fn to_dir_path(&self, base: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
        if base.as_os_str().is_empty() || self.file_name().is_empty() {
            return None;
        }
        existing(base.join(self.file_name()), fs)
    }

    /// Full path under `base`, accepted only when the package's hash sidecar
    /// holds exactly the declared hash value.
    ///
    /// Every failure (empty base, malformed hash, missing or unreadable
    /// sidecar, mismatch) reads as "not here".
    pub fn to_hash_matched_path(&self, base: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
        if base.as_os_str().is_empty() {
            return None;
        }
        let hash = LibraryHash::parse(&self.library_hash)?;

        let sidecar = self
            .package_dir(base, &self.library_version)
            .join(hash.sidecar_file_name(&self.library_name, &self.library_version));
        let contents = match fs.read_to_string(&sidecar) {
            Ok(contents) => contents,
            Err(err) => {
                trace!(sidecar = %sidecar.display(), error = %err, "hash sidecar unavailable");
                return None;
            }
        };
        if !hash.matches_sidecar(&contents) {
            trace!(sidecar = %sidecar.display(), "hash sidecar mismatch");
            return None;
        }

        self.to_full_path(base, fs)
    }

    fn package_dir(&self, base: &Path, version: &str) -> PathBuf {
        base.join(&self.library_name).join(version)
    }

    fn to_versioned_path(
        &self,
        base: &Path,
        version: &str,
        fs: &impl FileSystem,
    ) -> Option<PathBuf> {
        if base.as_os_str().is_empty() {
            return None;
        }
        existing(
            self.package_dir(base, version)
                .join(self.normalized_relative_path()),
            fs,
        )
    }
}

fn existing(candidate: PathBuf, fs: &impl FileSystem) -> Option<PathBuf> {
    if fs.file_exists(&candidate) {
        Some(candidate)
    } else {
        trace!(candidate = %candidate.display(), "not present");
        None
    }
}

fn file_name_of(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}

/// Turn a manifest-style forward-slash path into a platform path
pub fn normalize_relative(relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

/// Simple (extension-less) name of an asset file
///
/// Managed extensions are stripped including a `.ni` marker, so
/// `Foo.ni.dll` and `Foo.dll` share the simple name `Foo`. Other files lose
/// their last extension only.
pub fn simple_name(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    for ext in MANAGED_EXTENSIONS {
        if lower.len() > ext.len() && lower.ends_with(ext) {
            return &file_name[..file_name.len() - ext.len()];
        }
    }
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}
