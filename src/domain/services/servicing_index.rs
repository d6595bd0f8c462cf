//! Servicing redirection index
//!
//! An out-of-band patch table: `{root}/dotnet_servicing_index.txt` maps a
//! package file to a replacement file stored under the servicing root.
//!
//! ```text
//! package|System.Net.Http|4.1.0|lib/netstandard1.3/System.Net.Http.dll=patches/System.Net.Http.dll
//! ```
//!
//! The index is read on first lookup and kept for the resolver's lifetime.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::normalize_relative;
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::host_arch;

/// File name of the index inside the servicing root
pub const SERVICING_INDEX_FILE: &str = "dotnet_servicing_index.txt";

const PACKAGE_PREFIX: &str = "package|";

/// Lazily parsed servicing redirection table
#[derive(Debug)]
pub struct ServicingIndex {
    root: PathBuf,
    arch: String,
    redirections: OnceCell<HashMap<String, PathBuf>>,
}

impl ServicingIndex {
    /// Index rooted at `root`; an empty root never redirects anything
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            arch: host_arch().to_string(),
            redirections: OnceCell::new(),
        }
    }

    /// Override the architecture directory consulted first on a hit
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_parsed(&self) -> bool {
        self.redirections.get().is_some()
    }

    /// Find the patched file for a package asset
    ///
    /// Tries `root/{arch}/{redirect}` then `root/{redirect}` and only ever
    /// returns a path that exists.
    pub fn find_redirection(
        &self,
        name: &str,
        version: &str,
        relative: &str,
        fs: &impl FileSystem,
    ) -> Option<PathBuf> {
        let redirections = self.redirections.get_or_init(|| self.load(fs));
        if redirections.is_empty() {
            return None;
        }

        let redirect = redirections.get(&index_key(name, version, relative))?;

        let arch_specific = self.root.join(&self.arch).join(redirect);
        if fs.file_exists(&arch_specific) {
            debug!(path = %arch_specific.display(), "servicing redirect (arch-specific)");
            return Some(arch_specific);
        }

        let generic = self.root.join(redirect);
        if fs.file_exists(&generic) {
            debug!(path = %generic.display(), "servicing redirect");
            return Some(generic);
        }

        warn!(
            name,
            version,
            relative,
            redirect = %redirect.display(),
            "servicing index points at a missing file; ignoring"
        );
        None
    }

    fn load(&self, fs: &impl FileSystem) -> HashMap<String, PathBuf> {
        if self.root.as_os_str().is_empty() {
            return HashMap::new();
        }

        let index_file = self.root.join(SERVICING_INDEX_FILE);
        if !fs.file_exists(&index_file) {
            debug!(index = %index_file.display(), "no servicing index");
            return HashMap::new();
        }

        match fs.read_to_string(&index_file) {
            Ok(content) => {
                let redirections = parse_index(&content);
                debug!(
                    index = %index_file.display(),
                    count = redirections.len(),
                    "parsed servicing index"
                );
                redirections
            }
            Err(err) => {
                warn!(index = %index_file.display(), error = %err, "unreadable servicing index");
                HashMap::new()
            }
        }
    }
}

fn index_key(name: &str, version: &str, relative: &str) -> String {
    format!("{}|{}|{}", name, version, relative)
}

/// Parse index text into `name|version|relative -> redirect`
///
/// Lines not starting with `package|` are ignored; malformed `package|`
/// lines are skipped with a warning. The first mapping for a key wins.
pub fn parse_index(content: &str) -> HashMap<String, PathBuf> {
    let mut redirections = HashMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let Some(rest) = line.strip_prefix(PACKAGE_PREFIX) else {
            continue;
        };

        match parse_package_line(rest) {
            Some((name, version, relative, redirect)) => {
                redirections
                    .entry(index_key(name, version, relative))
                    .or_insert_with(|| normalize_relative(redirect));
            }
            None => warn!(line = idx + 1, content = line, "malformed servicing index line"),
        }
    }

    redirections
}

fn parse_package_line(rest: &str) -> Option<(&str, &str, &str, &str)> {
    let mut parts = rest.splitn(3, '|');
    let name = parts.next()?;
    let version = parts.next()?;
    let (relative, redirect) = parts.next()?.split_once('=')?;

    if [name, version, relative, redirect].iter().any(|s| s.is_empty()) {
        return None;
    }
    Some((name, version, relative, redirect))
}
