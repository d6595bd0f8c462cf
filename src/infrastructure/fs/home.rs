//! Home directory resolution with test isolation support.
//!
//! On Windows, `dirs::home_dir()` uses the Windows system API rather than
//! environment variables, so setting `HOME` in a test has no effect there.
//! `DEPSPROBE_TEST_HOME` overrides the home directory on every platform.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable for test isolation of the home directory.
pub const DEPSPROBE_TEST_HOME_VAR: &str = "DEPSPROBE_TEST_HOME";

/// Home directory used for `~/.dotnet` and the user config file.
pub fn home_dir() -> Option<PathBuf> {
    home_dir_from(std::env::var_os(DEPSPROBE_TEST_HOME_VAR))
}

fn home_dir_from(test_home: Option<OsString>) -> Option<PathBuf> {
    test_home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}
