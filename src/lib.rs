pub mod cli;
pub mod config;
pub mod export;
pub mod intelligence;
pub mod models;
pub mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Binary entry point: set up logging, parse arguments, run one command.
pub fn run() -> ExitCode {
    // stdout carries the exported table; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let args = cli::Cli::parse();
    let config = config::ExtractorConfig::from_env();

    match cli::execute(args, config) {
        Ok(outcome) => {
            tracing::debug!(run_id = %outcome.run_id, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
