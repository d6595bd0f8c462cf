//! Dependency resolver
//!
//! Turns the application (and, for portable apps, framework) manifests into
//! the lists a runtime host needs at startup:
//! - the directory holding the runtime loader
//! - the trusted platform assembly (TPA) list
//! - native and resource search directories
//!
//! Every entry is looked up through an ordered list of probe stages
//! (servicing, package caches, framework, additional probe paths); the first
//! stage producing an existing file wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};

use crate::domain::entities::{DependencyEntry, DependencyManifest, MANAGED_EXTENSIONS};
use crate::domain::ports::FileSystem;
use crate::domain::services::{ProbeConfig, RollForwardResolver, ServicingIndex};
use crate::domain::value_objects::{
    host_arch, runtime_loader_file_name, AssetKind, FxVersion, OrderedUniqueList,
    ResolvedProbePaths,
};
use crate::error::ResolveError;

/// Framework name whose versions live under `{install}/shared/`
pub const SHARED_FRAMEWORK_NAME: &str = "Microsoft.NETCore.App";

/// Host-supplied locations and policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub app_dir: PathBuf,
    pub fx_dir: Option<PathBuf>,
    pub package_cache: Option<PathBuf>,
    pub secondary_package_cache: Option<PathBuf>,
    pub servicing_root: Option<PathBuf>,
    pub core_servicing_root: Option<PathBuf>,
    pub additional_probes: Vec<PathBuf>,
    pub roll_forward: bool,
    pub platform_compat_package: Option<String>,
    pub requires_platform_compat_dir: bool,
    pub install_locations: Vec<PathBuf>,
    pub arch: String,
}

impl ResolverOptions {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            fx_dir: None,
            package_cache: None,
            secondary_package_cache: None,
            servicing_root: None,
            core_servicing_root: None,
            additional_probes: Vec::new(),
            roll_forward: true,
            platform_compat_package: None,
            requires_platform_compat_dir: false,
            install_locations: Vec::new(),
            arch: host_arch().to_string(),
        }
    }

    pub fn with_fx_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fx_dir = Some(dir.into());
        self
    }

    pub fn with_package_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_cache = Some(dir.into());
        self
    }

    pub fn with_secondary_package_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secondary_package_cache = Some(dir.into());
        self
    }

    pub fn with_servicing_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.servicing_root = Some(dir.into());
        self
    }

    pub fn with_core_servicing_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.core_servicing_root = Some(dir.into());
        self
    }

    pub fn with_additional_probes(mut self, dirs: Vec<PathBuf>) -> Self {
        self.additional_probes = dirs;
        self
    }

    pub fn with_roll_forward(mut self, roll_forward: bool) -> Self {
        self.roll_forward = roll_forward;
        self
    }

    /// Package whose native/resource directory is inserted right after the app dir
    pub fn with_platform_compat_package(mut self, name: impl Into<String>) -> Self {
        self.platform_compat_package = Some(name.into());
        self
    }

    pub fn with_requires_platform_compat_dir(mut self, required: bool) -> Self {
        self.requires_platform_compat_dir = required;
        self
    }

    pub fn with_install_locations(mut self, dirs: Vec<PathBuf>) -> Self {
        self.install_locations = dirs;
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }
}

/// Search-directory list flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirKind {
    Native,
    Resources,
}

impl SearchDirKind {
    pub fn asset_kind(self) -> AssetKind {
        match self {
            SearchDirKind::Native => AssetKind::Native,
            SearchDirKind::Resources => AssetKind::Resources,
        }
    }

    /// Directory to search for a resolved asset
    ///
    /// Native libraries are searched in their own directory. Satellite
    /// assemblies sit in a culture subdirectory (`Base/{culture}/X.resources.dll`)
    /// and the loader appends the culture itself, so `Base` is returned.
    pub fn reduce(self, asset: &Path) -> PathBuf {
        let levels = match self {
            SearchDirKind::Native => 1,
            SearchDirKind::Resources => 2,
        };
        let mut dir = asset;
        for _ in 0..levels {
            dir = dir.parent().unwrap_or(dir);
        }
        dir.to_path_buf()
    }
}

/// Everything the host needs to start the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    pub clr_dir: PathBuf,
    pub tpa: OrderedUniqueList,
    pub native: OrderedUniqueList,
    pub resources: OrderedUniqueList,
}

impl ResolvedHost {
    pub fn paths(&self) -> ResolvedProbePaths {
        ResolvedProbePaths {
            tpa: self.tpa.join(),
            native: self.native.join(),
            resources: self.resources.join(),
        }
    }
}

/// Managed assemblies found by listing one directory, keyed by lowercased
/// simple name
type DirAssemblies = BTreeMap<String, PathBuf>;

/// TPA key; the runtime binder compares simple names case-insensitively.
fn tpa_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Resolver for one process start
///
/// Holds the probe stages built from [`ResolverOptions`]. Apart from the
/// roll-forward cache and the lazily parsed servicing index, resolution
/// calls keep no state between them.
pub struct DepsResolver<'m, F: FileSystem> {
    options: ResolverOptions,
    app: &'m DependencyManifest,
    fx: Option<&'m DependencyManifest>,
    fx_dir: Option<PathBuf>,
    probes: Vec<ProbeConfig<'m>>,
    servicing: ServicingIndex,
    roll_forward: RollForwardResolver,
    fs: F,
}

impl<'m, F: FileSystem> DepsResolver<'m, F> {
    /// Build a resolver and its probe stages
    ///
    /// The framework manifest and directory are only used when the
    /// application manifest is portable.
    pub fn new(
        options: ResolverOptions,
        app: &'m DependencyManifest,
        fx: Option<&'m DependencyManifest>,
        fs: F,
    ) -> Self {
        let (fx, fx_dir) = match (app.is_portable(), fx, options.fx_dir.clone()) {
            (true, Some(manifest), Some(dir)) => (Some(manifest), Some(dir)),
            (true, _, _) => {
                warn!("portable application without framework manifest or directory; resolving as standalone");
                (None, None)
            }
            (false, _, _) => (None, None),
        };

        let servicing = ServicingIndex::new(options.servicing_root.clone().unwrap_or_default())
            .with_arch(options.arch.clone());

        let mut resolver = Self {
            options,
            app,
            fx,
            fx_dir,
            probes: Vec::new(),
            servicing,
            roll_forward: RollForwardResolver::new(),
            fs,
        };
        resolver.probes = resolver.build_probes();
        resolver
    }

    fn build_probes(&self) -> Vec<ProbeConfig<'m>> {
        let opts = &self.options;
        let mut probes = Vec::new();

        if let Some(core) = opts.core_servicing_root.as_deref() {
            if self.fs.dir_exists(core) {
                let ni = core.join(&opts.arch);
                if self.fs.dir_exists(&ni) {
                    probes.push(ProbeConfig::servicing_native_image(ni, opts.roll_forward));
                }
                probes.push(ProbeConfig::servicing(core.join("pkgs"), opts.roll_forward));
            }
        }

        for cache in [&opts.package_cache, &opts.secondary_package_cache]
            .into_iter()
            .flatten()
        {
            if self.fs.dir_exists(cache) {
                let ni = cache.join(&opts.arch);
                if self.fs.dir_exists(&ni) {
                    probes.push(ProbeConfig::cache_native_image(ni));
                }
                probes.push(ProbeConfig::cache(cache.clone()));
            }
        }

        if let (Some(manifest), Some(dir)) = (self.fx, self.fx_dir.as_ref()) {
            probes.push(ProbeConfig::framework(dir.clone(), manifest));
        }

        for dir in &opts.additional_probes {
            probes.push(ProbeConfig::additional(dir.clone(), opts.roll_forward));
        }

        for (idx, probe) in probes.iter().enumerate() {
            debug!(
                stage = idx + 1,
                kind = %probe.kind(),
                root = %probe.root_dir().display(),
                "probe stage"
            );
        }
        probes
    }

    pub fn probes(&self) -> &[ProbeConfig<'m>] {
        &self.probes
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn is_portable(&self) -> bool {
        self.fx.is_some()
    }

    pub fn roll_forward_cache(&self) -> &RollForwardResolver {
        &self.roll_forward
    }

    /// Manifests paired with the directory that owns their files
    fn sources(&self) -> Vec<(&'m DependencyManifest, &Path)> {
        let mut sources = vec![(self.app, self.options.app_dir.as_path())];
        if let (Some(fx), Some(dir)) = (self.fx, self.fx_dir.as_deref()) {
            sources.push((fx, dir));
        }
        sources
    }

    /// Look an entry up through servicing and then every probe stage
    pub fn probe_entry(&self, entry: &DependencyEntry) -> Option<PathBuf> {
        if entry.is_serviceable() && entry.is_package() {
            if let Some(path) = self.servicing.find_redirection(
                entry.library_name(),
                entry.library_version(),
                entry.relative_path(),
                &self.fs,
            ) {
                debug!(asset = entry.asset_name(), path = %path.display(), "resolved by servicing index");
                return Some(path);
            }
        }

        for probe in &self.probes {
            if let Some(path) = probe.probe(entry, &self.roll_forward, &self.fs) {
                debug!(
                    asset = entry.asset_name(),
                    stage = %probe.kind(),
                    path = %path.display(),
                    "resolved by probe stage"
                );
                return Some(path);
            }
        }

        trace!(
            asset = entry.asset_name(),
            library = entry.library_name(),
            version = entry.library_version(),
            "no probe stage matched"
        );
        None
    }

    /// Directory containing the runtime loader, or `None` (fatal for the host)
    pub fn resolve_runtime_loader_dir(&self) -> Option<PathBuf> {
        for (manifest, dir) in self.sources() {
            if let Some(loader) = self.find_runtime_loader(manifest, dir) {
                let clr_dir = loader
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf());
                info!(clr_dir = %clr_dir.display(), "runtime loader directory");
                return Some(clr_dir);
            }
        }

        let found = self.search_install_locations();
        match &found {
            Some(dir) => info!(clr_dir = %dir.display(), "runtime loader found in install location"),
            None => warn!(
                app_dir = %self.options.app_dir.display(),
                "runtime loader not found"
            ),
        }
        found
    }

    fn find_runtime_loader(&self, manifest: &DependencyManifest, dir: &Path) -> Option<PathBuf> {
        if let Some(entry) = manifest.runtime_loader_entry() {
            if let Some(path) = self.probe_entry(entry) {
                return Some(path);
            }
            if entry.is_rid_specific() {
                if let Some(path) = entry.to_rel_path(dir, &self.fs) {
                    return Some(path);
                }
            }
        }

        let local = dir.join(runtime_loader_file_name());
        self.fs.file_exists(&local).then_some(local)
    }

    /// Well-known installs: `{root}/shared/Microsoft.NETCore.App/{highest}/`,
    /// then `{root}` itself
    fn search_install_locations(&self) -> Option<PathBuf> {
        let loader = runtime_loader_file_name();
        for root in &self.options.install_locations {
            let shared = root.join("shared").join(SHARED_FRAMEWORK_NAME);
            if let Ok(entries) = self.fs.list_dir(&shared) {
                let mut versions: Vec<(FxVersion, PathBuf)> = entries
                    .into_iter()
                    .filter(|e| e.is_dir)
                    .filter_map(|e| FxVersion::parse(&e.name).map(|v| (v, shared.join(&e.name))))
                    .collect();
                versions.sort_by(|a, b| b.0.cmp(&a.0));
                if let Some((_, dir)) = versions
                    .into_iter()
                    .find(|(_, dir)| self.fs.file_exists(&dir.join(loader)))
                {
                    return Some(dir);
                }
            }

            if self.fs.file_exists(&root.join(loader)) {
                return Some(root.clone());
            }
            trace!(root = %root.display(), "no runtime loader in install location");
        }
        None
    }

    /// Trusted platform assemblies, unique by simple name
    pub fn resolve_tpa_list(&self) -> OrderedUniqueList {
        let mut tpa = OrderedUniqueList::new();
        let mut scans: HashMap<PathBuf, DirAssemblies> = HashMap::new();

        for (manifest, dir) in self.sources() {
            for entry in manifest.entries(AssetKind::Runtime) {
                let name = entry.asset_name();
                let key = tpa_key(name);
                if tpa.contains_key(&key) {
                    trace!(asset = name, "already on TPA list");
                    continue;
                }

                let found = self
                    .probe_entry(entry)
                    .or_else(|| {
                        entry
                            .is_rid_specific()
                            .then(|| entry.to_rel_path(dir, &self.fs))
                            .flatten()
                    })
                    .or_else(|| self.scanned(&mut scans, dir).get(&key).cloned());

                match found {
                    Some(path) => {
                        tpa.insert(key, self.fs.real_path(&path));
                    }
                    None => warn!(
                        asset = name,
                        library = entry.library_name(),
                        version = entry.library_version(),
                        "runtime asset not found; omitted from TPA list"
                    ),
                }
            }
        }

        // Assemblies on disk that no manifest entry claimed keep an absent
        // or partial manifest runnable.
        for (_, dir) in self.sources() {
            for (key, path) in self.scanned(&mut scans, dir).iter() {
                if !tpa.contains_key(key) {
                    trace!(path = %path.display(), "adding unlisted local assembly");
                    tpa.insert(key.clone(), self.fs.real_path(path));
                }
            }
        }

        info!(count = tpa.len(), "TPA list resolved");
        tpa
    }

    fn scanned<'s>(
        &self,
        scans: &'s mut HashMap<PathBuf, DirAssemblies>,
        dir: &Path,
    ) -> &'s DirAssemblies {
        scans
            .entry(dir.to_path_buf())
            .or_insert_with(|| self.scan_assemblies(dir))
    }

    /// List managed assemblies in `dir`; the first extension in
    /// [`MANAGED_EXTENSIONS`] order wins for each simple name.
    fn scan_assemblies(&self, dir: &Path) -> DirAssemblies {
        let mut found = DirAssemblies::new();
        let entries = match self.fs.list_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "cannot list directory for assemblies");
                return found;
            }
        };

        for ext in MANAGED_EXTENSIONS {
            for entry in entries.iter().filter(|e| !e.is_dir) {
                let lower = entry.name.to_ascii_lowercase();
                if lower.len() <= ext.len() || !lower.ends_with(ext) {
                    continue;
                }
                let stem = &entry.name[..entry.name.len() - ext.len()];
                // `.dll` also matches `X.ni.dll`; that file was handled by `.ni.dll`.
                if stem.to_ascii_lowercase().ends_with(".ni") {
                    continue;
                }
                found
                    .entry(tpa_key(stem))
                    .or_insert_with(|| dir.join(&entry.name));
            }
        }

        debug!(dir = %dir.display(), count = found.len(), "scanned directory assemblies");
        found
    }

    /// Native or resource search directories, unique by real path
    pub fn resolve_probe_dirs(&self, kind: SearchDirKind, clr_dir: Option<&Path>) -> OrderedUniqueList {
        let mut dirs = OrderedUniqueList::new();
        let mut compat_dir: Option<PathBuf> = None;

        for (manifest, dir) in self.sources() {
            for entry in manifest.entries(kind.asset_kind()) {
                if let Some(path) = self.probe_entry(entry) {
                    let found_dir = kind.reduce(&path);
                    // The first compat directory is held back so it lands
                    // right after the app directory.
                    if self.is_platform_compat(entry) {
                        match &compat_dir {
                            None => {
                                compat_dir = Some(found_dir);
                                continue;
                            }
                            Some(first) if *first == found_dir => continue,
                            Some(_) => {}
                        }
                    }
                    self.add_dir(&mut dirs, &found_dir);
                    continue;
                }

                if entry.is_rid_specific() {
                    if let Some(path) = entry.to_rel_path(dir, &self.fs) {
                        self.add_dir(&mut dirs, &kind.reduce(&path));
                        continue;
                    }
                }

                warn!(
                    kind = %entry.asset_kind(),
                    asset = entry.asset_name(),
                    library = entry.library_name(),
                    "asset not found; relying on default search directories"
                );
            }
        }

        self.add_dir(&mut dirs, &self.options.app_dir);

        match compat_dir {
            Some(dir) => self.add_dir(&mut dirs, &dir),
            None if self.options.requires_platform_compat_dir => {
                if let Some(fx_dir) = self.fx_dir.as_deref() {
                    self.add_dir(&mut dirs, fx_dir);
                }
            }
            None => {}
        }

        if let Some(fx_dir) = self.fx_dir.as_deref() {
            self.add_dir(&mut dirs, fx_dir);
        }
        if let Some(clr_dir) = clr_dir {
            self.add_dir(&mut dirs, clr_dir);
        }

        info!(kind = ?kind, count = dirs.len(), "search directories resolved");
        dirs
    }

    fn is_platform_compat(&self, entry: &DependencyEntry) -> bool {
        self.options
            .platform_compat_package
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(entry.library_name()))
    }

    fn add_dir(&self, dirs: &mut OrderedUniqueList, dir: &Path) {
        dirs.insert_path(self.fs.real_path(dir));
    }

    /// All three lists; individual misses never fail the call
    pub fn resolve_all(&self) -> ResolvedProbePaths {
        let clr_dir = self.resolve_runtime_loader_dir();
        ResolvedProbePaths {
            tpa: self.resolve_tpa_list().join(),
            native: self
                .resolve_probe_dirs(SearchDirKind::Native, clr_dir.as_deref())
                .join(),
            resources: self
                .resolve_probe_dirs(SearchDirKind::Resources, clr_dir.as_deref())
                .join(),
        }
    }

    /// Runtime loader directory plus the three lists
    ///
    /// Fails only when the runtime loader cannot be found.
    pub fn resolve(&self) -> Result<ResolvedHost, ResolveError> {
        let clr_dir = self
            .resolve_runtime_loader_dir()
            .ok_or_else(|| ResolveError::RuntimeLoaderNotFound {
                app_dir: self.options.app_dir.clone(),
                install_locations: self.options.install_locations.clone(),
            })?;

        Ok(ResolvedHost {
            tpa: self.resolve_tpa_list(),
            native: self.resolve_probe_dirs(SearchDirKind::Native, Some(&clr_dir)),
            resources: self.resolve_probe_dirs(SearchDirKind::Resources, Some(&clr_dir)),
            clr_dir,
        })
    }
}
