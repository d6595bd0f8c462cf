//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Counting)
//! - `manifest/` - Manifest readers (deps.json)
//! - `install_location` - Well-known runtime install roots

pub mod fs;
pub mod install_location;
pub mod manifest;

// Re-export for convenience
pub use fs::{CountingFs, LocalFs};
pub use install_location::default_install_locations;
pub use manifest::DepsJsonReader;
