//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_system;
pub mod manifest_reader;

pub use file_system::{DirEntryInfo, FileSystem, FsError, FsResult};
pub use manifest_reader::{ManifestError, ManifestReader, ManifestResult};
