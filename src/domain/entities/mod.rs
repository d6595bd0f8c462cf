//! Domain Entities
//!
//! - `DependencyEntry` - one artifact named by a manifest
//! - `DependencyManifest` - per-kind ordered entries for an app or framework

mod dependency_entry;
mod manifest;

pub use dependency_entry::{
    normalize_relative, simple_name, DependencyEntry, MANAGED_EXTENSIONS, PACKAGE_LIBRARY_TYPE,
};
pub use manifest::{DependencyManifest, RidFallbackGraph};
