//! depsprobe CLI - managed application dependency resolver
//!
//! Usage: depsprobe [OPTIONS] <COMMAND>
//!
//! Commands:
//!   resolve  Resolve the runtime loader directory, TPA list and search directories

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::resolve::{cmd_resolve, ResolveArgs};

/// Environment variable holding a tracing filter directive
const LOG_ENV_VAR: &str = "DEPSPROBE_LOG";

/// Install the stderr subscriber
///
/// `DEPSPROBE_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("depsprobe={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            app_dir,
            deps,
            fx_dir,
            fx_deps,
            package_cache,
            probes,
            no_roll_forward,
            rid,
        } => cmd_resolve(
            ResolveArgs {
                app_dir,
                deps,
                fx_dir,
                fx_deps,
                package_cache,
                probes,
                no_roll_forward,
                rid,
            },
            cli.config.as_deref(),
            cli.json,
            cli.verbose,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
