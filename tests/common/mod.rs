//! Common test utilities for depsprobe scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: an isolated directory tree plus helpers to run the binary
//! - `DepsJson`: a builder for `*.deps.json` manifests
//! - Assertion macros: `assert_output_contains!`, `assert_listed_before!`

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
pub use env::*;
pub use fixtures::*;
