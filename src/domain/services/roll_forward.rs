//! Version roll-forward
//!
//! Picks the highest compatible version directory under a probe location:
//! the newest patch of a release, or the newest prerelease of a
//! prerelease. A prerelease is never promoted to a stable release.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::ports::FileSystem;
use crate::domain::value_objects::FxVersion;

/// Memoizing roll-forward resolver
///
/// The cache is keyed by `(directory, glob)` and holds the best candidate
/// found by listing that directory. It is never invalidated: directory
/// contents are assumed stable for the life of the process.
#[derive(Debug, Default)]
pub struct RollForwardResolver {
    cache: RefCell<HashMap<(PathBuf, String), Option<FxVersion>>>,
}

impl RollForwardResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll `start` forward in `dir`, choosing the policy by its prerelease-ness
    pub fn roll_forward(&self, dir: &Path, start: &FxVersion, fs: &impl FileSystem) -> FxVersion {
        if start.is_prerelease() {
            self.prerelease_roll_forward(dir, start, fs)
        } else {
            self.patch_roll_forward(dir, start, fs)
        }
    }

    /// Highest non-prerelease `major.minor.*` in `dir`, never below `start`
    pub fn patch_roll_forward(
        &self,
        dir: &Path,
        start: &FxVersion,
        fs: &impl FileSystem,
    ) -> FxVersion {
        let best = self.best_match(dir, start.patch_glob(), |v| !v.is_prerelease(), fs);
        pick(start, best)
    }

    /// Highest prerelease of `major.minor.patch` in `dir`, never below `start`
    pub fn prerelease_roll_forward(
        &self,
        dir: &Path,
        start: &FxVersion,
        fs: &impl FileSystem,
    ) -> FxVersion {
        let best = self.best_match(dir, start.prerelease_glob(), FxVersion::is_prerelease, fs);
        pick(start, best)
    }

    /// Number of memoized `(dir, glob)` lookups
    pub fn cached_lookups(&self) -> usize {
        self.cache.borrow().len()
    }

    fn best_match(
        &self,
        dir: &Path,
        glob: String,
        accept: impl Fn(&FxVersion) -> bool,
        fs: &impl FileSystem,
    ) -> Option<FxVersion> {
        let key = (dir.to_path_buf(), glob);
        if let Some(cached) = self.cache.borrow().get(&key) {
            trace!(dir = %dir.display(), glob = %key.1, "roll-forward cache hit");
            return cached.clone();
        }

        let best = scan(dir, &key.1, accept, fs);
        debug!(
            dir = %dir.display(),
            glob = %key.1,
            best = best.as_ref().map(ToString::to_string).as_deref().unwrap_or("<none>"),
            "roll-forward scan"
        );
        self.cache.borrow_mut().insert(key, best.clone());
        best
    }
}

fn pick(start: &FxVersion, best: Option<FxVersion>) -> FxVersion {
    match best {
        Some(best) if best > *start => best,
        _ => start.clone(),
    }
}

fn scan(
    dir: &Path,
    glob: &str,
    accept: impl Fn(&FxVersion) -> bool,
    fs: &impl FileSystem,
) -> Option<FxVersion> {
    let prefix = glob.trim_end_matches('*');
    let entries = match fs.list_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            trace!(dir = %dir.display(), error = %err, "roll-forward directory unavailable");
            return None;
        }
    };

    entries
        .into_iter()
        .filter(|entry| entry.is_dir && entry.name.starts_with(prefix))
        .filter_map(|entry| match FxVersion::parse(&entry.name) {
            Some(version) => Some(version),
            None => {
                debug!(dir = %dir.display(), candidate = %entry.name, "skipping unparsable version");
                None
            }
        })
        .filter(|version| accept(version))
        .max()
}
