//! Asset Kind Value Object
//!
//! The closed set of asset categories a dependency manifest distinguishes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of asset carried by a manifest entry
///
/// The ordinal matters: a manifest stores one ordered entry sequence per
/// kind, indexed by [`AssetKind::ordinal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Managed assemblies that go on the TPA list
    Runtime,
    /// Satellite (culture-specific) resource assemblies
    Resources,
    /// Native libraries loaded through the platform loader
    Native,
}

impl AssetKind {
    /// Number of asset kinds
    pub const COUNT: usize = 3;

    /// All kinds in ordinal order
    pub const ALL: [AssetKind; Self::COUNT] =
        [AssetKind::Runtime, AssetKind::Resources, AssetKind::Native];

    /// Index of this kind in per-kind storage
    pub const fn ordinal(self) -> usize {
        match self {
            AssetKind::Runtime => 0,
            AssetKind::Resources => 1,
            AssetKind::Native => 2,
        }
    }

    /// Key used for this kind's asset map in a deps.json target library
    pub const fn json_key(self) -> &'static str {
        match self {
            AssetKind::Runtime => "runtime",
            AssetKind::Resources => "resources",
            AssetKind::Native => "native",
        }
    }

    /// Parse the `assetType` value of a `runtimeTargets` asset
    pub fn from_asset_type(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "runtime" => Some(AssetKind::Runtime),
            "resources" => Some(AssetKind::Resources),
            "native" => Some(AssetKind::Native),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}
