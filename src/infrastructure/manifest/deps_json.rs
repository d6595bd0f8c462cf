//! deps.json Manifest Reader
//!
//! Implements the ManifestReader port for the JSON dependency manifest
//! written next to an application or shared framework:
//!
//! ```json
//! {
//!   "runtimeTarget": { "name": ".NETCoreApp,Version=v1.0" },
//!   "targets": {
//!     ".NETCoreApp,Version=v1.0": {
//!       "Newtonsoft.Json/9.0.1": {
//!         "runtime": { "lib/netstandard1.0/Newtonsoft.Json.dll": {} }
//!       }
//!     }
//!   },
//!   "libraries": {
//!     "Newtonsoft.Json/9.0.1": { "type": "package", "serviceable": true, "sha512": "sha512-..." }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::entities::{DependencyEntry, DependencyManifest, RidFallbackGraph};
use crate::domain::ports::{FileSystem, ManifestError, ManifestReader, ManifestResult};
use crate::domain::services::SHARED_FRAMEWORK_NAME;
use crate::domain::value_objects::{host_rid, runtime_loader_file_name, AssetKind};
use crate::infrastructure::fs::LocalFs;

/// Top-level document; maps keep file order (`preserve_order`)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepsJson {
    #[serde(default)]
    runtime_target: Option<RuntimeTarget>,
    #[serde(default)]
    targets: Map<String, Value>,
    #[serde(default)]
    libraries: Map<String, Value>,
    #[serde(default)]
    runtimes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuntimeTarget {
    Name(String),
    Target { name: String },
}

impl RuntimeTarget {
    fn into_name(self) -> String {
        match self {
            RuntimeTarget::Name(name) | RuntimeTarget::Target { name } => name,
        }
    }
}

/// One `targets[target]["name/version"]` object
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetLibrary {
    #[serde(default)]
    runtime: Map<String, Value>,
    #[serde(default)]
    native: Map<String, Value>,
    #[serde(default)]
    resources: Map<String, Value>,
    #[serde(default)]
    runtime_targets: Map<String, Value>,
}

impl TargetLibrary {
    fn assets(&self, kind: AssetKind) -> &Map<String, Value> {
        match kind {
            AssetKind::Runtime => &self.runtime,
            AssetKind::Native => &self.native,
            AssetKind::Resources => &self.resources,
        }
    }
}

/// One `libraries["name/version"]` object
#[derive(Debug, Default, Deserialize)]
struct LibraryInfo {
    #[serde(default, rename = "type")]
    library_type: String,
    #[serde(default)]
    serviceable: bool,
    #[serde(default)]
    sha512: String,
}

/// deps.json reader
///
/// RID-specific assets (`runtimeTargets`) are selected for one runtime
/// identifier, the host's by default.
pub struct DepsJsonReader<F: FileSystem = LocalFs> {
    fs: F,
    rid: String,
    fallback_graph: Option<RidFallbackGraph>,
}

impl DepsJsonReader<LocalFs> {
    /// Create a reader with the default file system
    pub fn new() -> Self {
        Self::with_fs(LocalFs::new())
    }
}

impl Default for DepsJsonReader<LocalFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> DepsJsonReader<F> {
    /// Create with a custom file system (for testing)
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            rid: host_rid(),
            fallback_graph: None,
        }
    }

    /// Runtime identifier used to pick `runtimeTargets` assets
    pub fn with_rid(mut self, rid: impl Into<String>) -> Self {
        self.rid = rid.into();
        self
    }

    /// RID graph used when a manifest has no `runtimes` section of its own
    ///
    /// Portable applications rely on the framework manifest's graph.
    pub fn with_fallback_graph(mut self, graph: RidFallbackGraph) -> Self {
        self.fallback_graph = Some(graph);
        self
    }

    pub fn rid(&self) -> &str {
        &self.rid
    }

    /// Parse manifest text; `path` is only used in errors and logs
    pub fn parse(&self, path: &Path, content: &str) -> ManifestResult<DependencyManifest> {
        let parse_err = |source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let doc: DepsJson = serde_json::from_str(content).map_err(parse_err)?;

        let target_name = doc
            .runtime_target
            .map(RuntimeTarget::into_name)
            .or_else(|| doc.targets.keys().next().cloned());
        // A RID-qualified target (`.NETCoreApp,Version=v1.0/linux-x64`) means
        // a self-contained application.
        let portable = target_name.as_deref().map_or(true, |name| !name.contains('/'));

        let own_graph = parse_rid_graph(&doc.runtimes);
        let graph = if own_graph.is_empty() {
            self.fallback_graph.clone().unwrap_or_default()
        } else {
            own_graph.clone()
        };

        let mut manifest = DependencyManifest::new(portable);
        if !own_graph.is_empty() {
            manifest.set_rid_fallback_graph(own_graph);
        }

        let Some(libraries) = target_name
            .as_deref()
            .and_then(|name| doc.targets.get(name))
            .and_then(Value::as_object)
        else {
            warn!(
                manifest = %path.display(),
                target = target_name.as_deref().unwrap_or(""),
                "manifest has no assets for its runtime target"
            );
            return Ok(manifest);
        };

        let loader = runtime_loader_file_name();
        for (key, value) in libraries {
            let Some((name, version)) = key.split_once('/') else {
                return Err(ManifestError::InvalidLibraryKey {
                    path: path.to_path_buf(),
                    key: key.clone(),
                });
            };

            let target_lib: TargetLibrary =
                serde_json::from_value(value.clone()).map_err(parse_err)?;
            let info: LibraryInfo = match doc.libraries.get(key) {
                Some(value) => serde_json::from_value(value.clone()).map_err(parse_err)?,
                None => {
                    warn!(manifest = %path.display(), library = %key, "library missing from 'libraries'");
                    LibraryInfo::default()
                }
            };

            for kind in AssetKind::ALL {
                let rid_assets =
                    select_rid_assets(&target_lib.runtime_targets, kind, &self.rid, &graph);
                let rid_specific = !rid_assets.is_empty();
                let assets: Vec<&str> = if rid_specific {
                    rid_assets
                } else {
                    target_lib.assets(kind).keys().map(String::as_str).collect()
                };

                for asset in assets {
                    let mut entry = DependencyEntry::new(kind, name, version, asset)
                        .with_hash(info.sha512.as_str())
                        .with_serviceable(info.serviceable)
                        .with_rid_specific(rid_specific);
                    if !info.library_type.is_empty() {
                        entry = entry.with_library_type(info.library_type.as_str());
                    }

                    if kind == AssetKind::Native
                        && entry.file_name() == loader
                        && manifest.runtime_loader_entry().is_none()
                    {
                        manifest.push_runtime_loader(entry);
                    } else {
                        manifest.push_entry(entry);
                    }
                }
            }
        }

        debug!(
            manifest = %path.display(),
            portable,
            entries = manifest.entry_count(),
            "manifest parsed"
        );
        Ok(manifest)
    }
}

impl<F: FileSystem> ManifestReader for DepsJsonReader<F> {
    fn read(&self, path: &Path) -> ManifestResult<Option<DependencyManifest>> {
        if !self.fs.file_exists(path) {
            debug!(manifest = %path.display(), "manifest not found");
            return Ok(None);
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| ManifestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.parse(path, &content).map(Some)
    }
}

/// File name suffix of dependency manifests
pub const DEPS_FILE_SUFFIX: &str = ".deps.json";

/// Application manifest in `app_dir`: the first `*.deps.json` by name
pub fn find_deps_file(app_dir: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
    let entries = fs.list_dir(app_dir).ok()?;
    entries
        .into_iter()
        .find(|e| {
            !e.is_dir && e.name.len() > DEPS_FILE_SUFFIX.len() && e.name.ends_with(DEPS_FILE_SUFFIX)
        })
        .map(|e| app_dir.join(e.name))
}

/// Shared framework manifest location inside `fx_dir`
pub fn framework_deps_file(fx_dir: &Path) -> PathBuf {
    fx_dir.join(format!("{}{}", SHARED_FRAMEWORK_NAME, DEPS_FILE_SUFFIX))
}

fn parse_rid_graph(runtimes: &Map<String, Value>) -> RidFallbackGraph {
    let mut graph = RidFallbackGraph::new();
    for (rid, fallbacks) in runtimes {
        let fallbacks = fallbacks
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        graph.insert(rid.clone(), fallbacks);
    }
    graph
}

/// `runtimeTargets` assets of `kind` for the closest RID in the fallback chain
fn select_rid_assets<'a>(
    runtime_targets: &'a Map<String, Value>,
    kind: AssetKind,
    rid: &str,
    graph: &RidFallbackGraph,
) -> Vec<&'a str> {
    if runtime_targets.is_empty() {
        return Vec::new();
    }

    for candidate in graph.candidates(rid) {
        let matched: Vec<&str> = runtime_targets
            .iter()
            .filter(|(_, meta)| {
                meta.get("rid").and_then(Value::as_str) == Some(candidate)
                    && meta
                        .get("assetType")
                        .and_then(Value::as_str)
                        .and_then(AssetKind::from_asset_type)
                        == Some(kind)
            })
            .map(|(asset, _)| asset.as_str())
            .collect();
        if !matched.is_empty() {
            return matched;
        }
    }
    Vec::new()
}
