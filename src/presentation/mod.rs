//! Presentation Layer
//!
//! Output formatting (text/JSON) for the `depsprobe` binary. Argument
//! parsing lives with the binary in `cli.rs`.

pub mod output;

pub use output::{render, OutputFormat, ResolveReport};
