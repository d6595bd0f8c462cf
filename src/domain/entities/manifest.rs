//! Dependency manifest entity
//!
//! The already-solved set of artifacts an application (or shared framework)
//! needs, grouped per asset kind in manifest order.

use std::collections::{HashMap, HashSet};

use crate::domain::entities::DependencyEntry;
use crate::domain::value_objects::AssetKind;

/// Runtime identifier fallback graph
///
/// Maps a RID to the ordered RIDs whose assets it may use instead
/// (e.g. `linux-x64 -> [linux, unix-x64, unix, any, base]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RidFallbackGraph {
    fallbacks: HashMap<String, Vec<String>>,
}

impl RidFallbackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rid: impl Into<String>, fallbacks: Vec<String>) {
        self.fallbacks.insert(rid.into(), fallbacks);
    }

    pub fn with(mut self, rid: impl Into<String>, fallbacks: &[&str]) -> Self {
        self.insert(rid, fallbacks.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Fallbacks declared for `rid`, empty when unknown
    pub fn fallbacks(&self, rid: &str) -> &[String] {
        self.fallbacks.get(rid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `rid` followed by its fallbacks, in probe order
    pub fn candidates<'a>(&'a self, rid: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(rid).chain(self.fallbacks(rid).iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Dependency manifest for one application or framework
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: [Vec<DependencyEntry>; AssetKind::COUNT],
    runtime_loader: Option<usize>,
    rid_fallback_graph: Option<RidFallbackGraph>,
    packages: HashSet<(String, String)>,
    portable: bool,
    exists: bool,
}

impl DependencyManifest {
    /// Create an empty manifest that came from an existing source
    pub fn new(portable: bool) -> Self {
        Self {
            portable,
            exists: true,
            ..Self::default()
        }
    }

    /// Manifest standing in for an absent manifest file
    pub fn missing(portable: bool) -> Self {
        Self {
            portable,
            exists: false,
            ..Self::default()
        }
    }

    /// Append an entry to its kind's sequence
    pub fn push_entry(&mut self, entry: DependencyEntry) {
        self.packages.insert((
            entry.library_name().to_string(),
            entry.library_version().to_string(),
        ));
        self.entries[entry.asset_kind().ordinal()].push(entry);
    }

    /// Append a native entry and designate it as the runtime loader
    pub fn push_runtime_loader(&mut self, entry: DependencyEntry) {
        debug_assert_eq!(entry.asset_kind(), AssetKind::Native);
        let index = self.entries[AssetKind::Native.ordinal()].len();
        self.push_entry(entry);
        self.runtime_loader = Some(index);
    }

    pub fn with_entry(mut self, entry: DependencyEntry) -> Self {
        self.push_entry(entry);
        self
    }

    pub fn with_runtime_loader(mut self, entry: DependencyEntry) -> Self {
        self.push_runtime_loader(entry);
        self
    }

    pub fn with_rid_fallback_graph(mut self, graph: RidFallbackGraph) -> Self {
        self.rid_fallback_graph = Some(graph);
        self
    }

    pub fn set_rid_fallback_graph(&mut self, graph: RidFallbackGraph) {
        self.rid_fallback_graph = Some(graph);
    }

    /// Entries of one kind, in manifest order
    pub fn entries(&self, kind: AssetKind) -> &[DependencyEntry] {
        &self.entries[kind.ordinal()]
    }

    pub fn runtime_loader_entry(&self) -> Option<&DependencyEntry> {
        self.runtime_loader
            .and_then(|idx| self.entries[AssetKind::Native.ordinal()].get(idx))
    }

    pub fn rid_fallback_graph(&self) -> Option<&RidFallbackGraph> {
        self.rid_fallback_graph.as_ref()
    }

    /// Whether any entry names this exact package
    pub fn has_package(&self, name: &str, version: &str) -> bool {
        self.packages
            .contains(&(name.to_string(), version.to_string()))
    }

    pub fn is_portable(&self) -> bool {
        self.portable
    }

    /// False when built for a manifest file that did not exist
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn entry_count(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }
}
