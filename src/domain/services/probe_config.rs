//! Probe stage configuration
//!
//! One search location plus the policy deciding which entries it may serve
//! and how an entry maps onto its layout.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::entities::{DependencyEntry, DependencyManifest};
use crate::domain::ports::FileSystem;
use crate::domain::services::RollForwardResolver;
use crate::domain::value_objects::{AssetKind, FxVersion};

/// What a probe stage stands for, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Architecture-specific native images under the core servicing root
    ServicingNativeImage,
    /// Package layout under the core servicing root
    Servicing,
    /// Architecture-specific native images in a package cache
    CacheNativeImage,
    /// Hash-verified package cache
    Cache,
    /// Shared framework directory, trusted through its own manifest
    Framework,
    /// Caller-supplied additional probe directory
    Additional,
    /// Anything built through [`ProbeConfig::new`]
    Custom,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProbeKind::ServicingNativeImage => "servicing-ni",
            ProbeKind::Servicing => "servicing",
            ProbeKind::CacheNativeImage => "cache-ni",
            ProbeKind::Cache => "cache",
            ProbeKind::Framework => "framework",
            ProbeKind::Additional => "additional",
            ProbeKind::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// Matching policy flags of a probe stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbePolicy {
    pub match_hash: bool,
    pub roll_forward: bool,
    pub only_serviceable: bool,
    pub only_runtime_assets: bool,
}

/// Rejected flag combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProbeConfigError {
    #[error("a probe stage cannot both roll forward and match hashes")]
    RollForwardWithHashMatch,

    #[error("a manifest-bound probe stage cannot roll forward")]
    RollForwardWithBoundManifest,
}

/// One probe stage
#[derive(Debug, Clone)]
pub struct ProbeConfig<'m> {
    kind: ProbeKind,
    root_dir: PathBuf,
    policy: ProbePolicy,
    bound_manifest: Option<&'m DependencyManifest>,
}

impl<'m> ProbeConfig<'m> {
    /// Build a stage from arbitrary flags, rejecting invalid combinations
    pub fn new(
        root_dir: impl Into<PathBuf>,
        policy: ProbePolicy,
        bound_manifest: Option<&'m DependencyManifest>,
    ) -> Result<Self, ProbeConfigError> {
        if policy.roll_forward && policy.match_hash {
            return Err(ProbeConfigError::RollForwardWithHashMatch);
        }
        if policy.roll_forward && bound_manifest.is_some() {
            return Err(ProbeConfigError::RollForwardWithBoundManifest);
        }
        Ok(Self::unchecked(ProbeKind::Custom, root_dir.into(), policy, bound_manifest))
    }

    /// `{core_servicing}/{arch}`: serviceable runtime assets only
    pub fn servicing_native_image(root_dir: impl Into<PathBuf>, roll_forward: bool) -> Self {
        let policy = ProbePolicy {
            roll_forward,
            only_serviceable: true,
            only_runtime_assets: true,
            ..ProbePolicy::default()
        };
        Self::unchecked(ProbeKind::ServicingNativeImage, root_dir.into(), policy, None)
    }

    /// `{core_servicing}/pkgs`: serviceable assets only
    pub fn servicing(root_dir: impl Into<PathBuf>, roll_forward: bool) -> Self {
        let policy = ProbePolicy {
            roll_forward,
            only_serviceable: true,
            ..ProbePolicy::default()
        };
        Self::unchecked(ProbeKind::Servicing, root_dir.into(), policy, None)
    }

    /// `{package_cache}/{arch}`: hash-verified
    pub fn cache_native_image(root_dir: impl Into<PathBuf>) -> Self {
        let policy = ProbePolicy {
            match_hash: true,
            ..ProbePolicy::default()
        };
        Self::unchecked(ProbeKind::CacheNativeImage, root_dir.into(), policy, None)
    }

    /// Package cache: hash-verified
    pub fn cache(root_dir: impl Into<PathBuf>) -> Self {
        let policy = ProbePolicy {
            match_hash: true,
            ..ProbePolicy::default()
        };
        Self::unchecked(ProbeKind::Cache, root_dir.into(), policy, None)
    }

    /// Framework directory bound to the framework's own manifest
    pub fn framework(root_dir: impl Into<PathBuf>, manifest: &'m DependencyManifest) -> Self {
        Self::unchecked(
            ProbeKind::Framework,
            root_dir.into(),
            ProbePolicy::default(),
            Some(manifest),
        )
    }

    /// Additional probe directory: unrestricted
    pub fn additional(root_dir: impl Into<PathBuf>, roll_forward: bool) -> Self {
        let policy = ProbePolicy {
            roll_forward,
            ..ProbePolicy::default()
        };
        Self::unchecked(ProbeKind::Additional, root_dir.into(), policy, None)
    }

    fn unchecked(
        kind: ProbeKind,
        root_dir: PathBuf,
        policy: ProbePolicy,
        bound_manifest: Option<&'m DependencyManifest>,
    ) -> Self {
        Self {
            kind,
            root_dir,
            policy,
            bound_manifest,
        }
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn policy(&self) -> ProbePolicy {
        self.policy
    }

    pub fn is_manifest_bound(&self) -> bool {
        self.bound_manifest.is_some()
    }

    /// Whether this stage may serve `entry` at all
    pub fn accepts(&self, entry: &DependencyEntry) -> bool {
        if self.policy.only_serviceable && !entry.is_serviceable() {
            return false;
        }
        if self.policy.only_runtime_assets && entry.asset_kind() != AssetKind::Runtime {
            return false;
        }
        if let Some(manifest) = self.bound_manifest {
            // RID selection already happened when the framework manifest was
            // written; only its own packages may come from its directory.
            return manifest.has_package(entry.library_name(), entry.library_version());
        }
        true
    }

    /// Locate `entry` in this stage, or `None` to fall through
    pub fn probe(
        &self,
        entry: &DependencyEntry,
        roll_forward: &RollForwardResolver,
        fs: &impl FileSystem,
    ) -> Option<PathBuf> {
        if !self.accepts(entry) {
            trace!(stage = %self.kind, asset = entry.asset_name(), "stage does not apply");
            return None;
        }

        let root = self.root_dir.as_path();
        if self.bound_manifest.is_some() {
            return if entry.is_rid_specific() {
                entry.to_rel_path(root, fs)
            } else {
                entry
                    .to_full_path(root, fs)
                    .or_else(|| entry.to_dir_path(root, fs))
            };
        }

        if self.policy.match_hash {
            return entry.to_hash_matched_path(root, fs);
        }

        if self.policy.roll_forward {
            if let Some(start) = FxVersion::parse(entry.library_version()) {
                let package_dir = root.join(entry.library_name());
                let rolled = roll_forward.roll_forward(&package_dir, &start, fs);
                if rolled != start {
                    let rolled = rolled.to_string();
                    if let Some(path) = entry.to_roll_forward_path(root, &rolled, fs) {
                        trace!(stage = %self.kind, from = entry.library_version(), to = %rolled, "rolled forward");
                        return Some(path);
                    }
                }
            }
        }

        entry.to_full_path(root, fs)
    }
}
