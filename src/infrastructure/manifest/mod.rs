//! Manifest Readers
//!
//! Implementations of the ManifestReader port.

mod deps_json;

pub use deps_json::{find_deps_file, framework_deps_file, DepsJsonReader, DEPS_FILE_SUFFIX};
