//! Resolve command handler
//!
//! Loads configuration and manifests, runs the resolver and prints the
//! result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use depsprobe::config::HostConfig;
use depsprobe::domain::entities::DependencyManifest;
use depsprobe::domain::ports::ManifestReader;
use depsprobe::domain::services::DepsResolver;
use depsprobe::infrastructure::manifest::{find_deps_file, framework_deps_file, DepsJsonReader};
use depsprobe::infrastructure::{CountingFs, LocalFs};
use depsprobe::presentation::{render, OutputFormat, ResolveReport};

/// Flags of the `resolve` subcommand; each one overrides config and env
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub app_dir: Option<PathBuf>,
    pub deps: Option<PathBuf>,
    pub fx_dir: Option<PathBuf>,
    pub fx_deps: Option<PathBuf>,
    pub package_cache: Option<PathBuf>,
    pub probes: Vec<PathBuf>,
    pub no_roll_forward: bool,
    pub rid: Option<String>,
}

impl ResolveArgs {
    fn apply(self, config: &mut HostConfig) {
        let paths = &mut config.paths;
        if self.app_dir.is_some() {
            paths.app_dir = self.app_dir;
        }
        if self.deps.is_some() {
            paths.deps_file = self.deps;
        }
        if self.fx_dir.is_some() {
            paths.framework_dir = self.fx_dir;
        }
        if self.fx_deps.is_some() {
            paths.framework_deps_file = self.fx_deps;
        }
        if self.package_cache.is_some() {
            paths.package_cache = self.package_cache;
        }
        if !self.probes.is_empty() {
            paths.additional_probes = self.probes;
        }
        if self.no_roll_forward {
            config.resolution.roll_forward = false;
        }
        if self.rid.is_some() {
            config.resolution.rid = self.rid;
        }
    }
}

/// Execute the resolve command
pub fn cmd_resolve(
    args: ResolveArgs,
    config_path: Option<&Path>,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let (mut config, warnings) = HostConfig::load_or_default(config_path, &cwd)?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    args.apply(&mut config);

    let app_dir = config.paths.app_dir.clone().unwrap_or_else(|| cwd.clone());
    let rid = config.rid();
    let fx_dir = config.paths.framework_dir.clone();

    let fx = match &fx_dir {
        Some(dir) => {
            let path = config
                .paths
                .framework_deps_file
                .clone()
                .unwrap_or_else(|| framework_deps_file(dir));
            let reader = DepsJsonReader::new().with_rid(rid.as_str());
            Some(reader.read_or_missing(&path, false)?)
        }
        None => None,
    };

    let app = read_app_manifest(&config, &app_dir, &rid, fx.as_ref())?;
    info!(
        app_dir = %app_dir.display(),
        rid = %rid,
        portable = app.is_portable(),
        entries = app.entry_count(),
        "application manifest loaded"
    );

    let fs = CountingFs::new(LocalFs::new());
    let counters = fs.counters();
    let resolver = DepsResolver::new(config.resolver_options(&app_dir), &app, fx.as_ref(), fs);
    let host = resolver.resolve()?;

    let report = ResolveReport {
        app_dir: &app_dir,
        host: &host,
        is_portable: resolver.is_portable(),
        fs_stats: (verbose > 0).then(|| counters.snapshot()),
    };
    print!("{}", render(&report, OutputFormat::from_json_flag(json)));
    if json {
        println!();
    }
    Ok(())
}

fn read_app_manifest(
    config: &HostConfig,
    app_dir: &Path,
    rid: &str,
    fx: Option<&DependencyManifest>,
) -> Result<DependencyManifest> {
    let portable_if_missing = config.paths.framework_dir.is_some();
    let path = config
        .paths
        .deps_file
        .clone()
        .or_else(|| find_deps_file(app_dir, &LocalFs));
    let Some(path) = path else {
        warn!(app_dir = %app_dir.display(), "no application manifest; using directory contents only");
        return Ok(DependencyManifest::missing(portable_if_missing));
    };

    let mut reader = DepsJsonReader::new().with_rid(rid);
    if let Some(graph) = fx.and_then(DependencyManifest::rid_fallback_graph) {
        reader = reader.with_fallback_graph(graph.clone());
    }
    reader
        .read_or_missing(&path, portable_if_missing)
        .with_context(|| format!("loading {}", path.display()))
}
