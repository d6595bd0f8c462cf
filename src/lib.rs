//! depsprobe - dependency resolution for a managed-runtime application host
//!
//! Given an application's dependency manifest (and, for portable apps, the
//! shared framework's), computes what the host hands the runtime at startup:
//! the runtime loader directory, the trusted platform assembly list, and the
//! native and resource search directories.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use config::{ConfigError, HostConfig};
pub use domain::entities::{DependencyEntry, DependencyManifest};
pub use domain::services::{DepsResolver, ResolvedHost, ResolverOptions, SearchDirKind};
pub use domain::value_objects::{AssetKind, FxVersion, ResolvedProbePaths};
pub use error::{ResolveError, ResolveResult};
pub use infrastructure::{DepsJsonReader, LocalFs};
