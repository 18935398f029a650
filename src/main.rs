use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
mod command;
mod config;
mod keepalive;
mod pipeline;
mod profile;
mod steps;
mod terminal;
mod toolchain;

use crate::cli::RootArgs;
use crate::command::{CommandRunner, SystemRunner};
use crate::pipeline::{Pipeline, PipelineOptions, PipelineOutcome};
use crate::steps::Session;
use crate::terminal::Terminal;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "MACDEPLOY_LOG";

/// Exit status when the desired-state document cannot be loaded.
const CONFIG_EXIT_CODE: u8 = 1;

/// Exit status after the operator confirmed a restart.
const RESTART_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            println!("Error reading config: {err:#}");
            return ExitCode::from(CONFIG_EXIT_CODE);
        }
    };
    tracing::debug!(path = %args.config.display(), "loaded desired state");

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let session = Session::new(runner, Terminal::stdio(!args.no_clear), args.profile_path());
    match Pipeline::new(session, PipelineOptions::default()).run(&config) {
        PipelineOutcome::Completed => ExitCode::SUCCESS,
        PipelineOutcome::Restarting(outcome) => {
            tracing::debug!(outcome = %outcome, "exiting for restart");
            ExitCode::from(RESTART_EXIT_CODE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
