//! File System Implementations
//!
//! Concrete implementations of the FileSystem port, plus home directory
//! lookup.

mod counting;
mod home;
mod local;

pub use counting::{CountingFs, FsCounters, FsStats};
pub use home::{home_dir, DEPSPROBE_TEST_HOME_VAR};
pub use local::LocalFs;
