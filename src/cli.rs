use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// depsprobe - resolve the startup probe paths of a managed application
#[derive(Parser, Debug)]
#[command(name = "depsprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv); DEPSPROBE_LOG overrides it
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./depsprobe.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the runtime loader directory, TPA list and search directories
    Resolve {
        /// Application directory (default: config, then current directory)
        #[arg(long, value_name = "DIR")]
        app_dir: Option<PathBuf>,

        /// Application manifest (default: the *.deps.json in the app directory)
        #[arg(long, value_name = "FILE")]
        deps: Option<PathBuf>,

        /// Shared framework directory; makes the application portable
        #[arg(long, value_name = "DIR")]
        fx_dir: Option<PathBuf>,

        /// Framework manifest (default: Microsoft.NETCore.App.deps.json in the framework directory)
        #[arg(long, value_name = "FILE")]
        fx_deps: Option<PathBuf>,

        /// Hash-verified package cache
        #[arg(long, value_name = "DIR")]
        package_cache: Option<PathBuf>,

        /// Additional probe directory (can be specified multiple times)
        #[arg(long = "probe", value_name = "DIR")]
        probes: Vec<PathBuf>,

        /// Only accept the exact package versions named by the manifests
        #[arg(long)]
        no_roll_forward: bool,

        /// Runtime identifier for RID-specific asset selection
        #[arg(long)]
        rid: Option<String>,
    },
}
