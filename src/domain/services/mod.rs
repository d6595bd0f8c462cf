//! Domain Services
//!
//! Resolution logic over the domain entities. All disk access goes through
//! the [`FileSystem`](crate::domain::ports::FileSystem) port.

mod deps_resolver;
mod probe_config;
mod roll_forward;
mod servicing_index;

pub use deps_resolver::{
    DepsResolver, ResolvedHost, ResolverOptions, SearchDirKind, SHARED_FRAMEWORK_NAME,
};
pub use probe_config::{ProbeConfig, ProbeConfigError, ProbeKind, ProbePolicy};
pub use roll_forward::RollForwardResolver;
pub use servicing_index::{parse_index, ServicingIndex, SERVICING_INDEX_FILE};
