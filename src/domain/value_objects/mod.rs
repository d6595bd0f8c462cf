//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod asset_kind;
mod library_hash;
mod path_list;
mod platform;
mod version;

pub use asset_kind::AssetKind;
pub use library_hash::LibraryHash;
pub use path_list::{OrderedUniqueList, ResolvedProbePaths, PATH_LIST_SEPARATOR};
pub use platform::{host_arch, host_rid, runtime_loader_file_name};
pub use version::{FxVersion, VersionParseError};
