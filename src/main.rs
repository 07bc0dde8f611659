// ABOUTME: Entry point for the specport binary.
// ABOUTME: Loads .env, initializes tracing, parses CLI arguments, and maps the command result to an exit code.

use std::process::ExitCode;

use clap::Parser;
use specport_cli::{Cli, ConsoleLogger, FsFileWriter, Logger};

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // stdout carries exported documents, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("specport=warn")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let logger = ConsoleLogger;
    let outcome = runtime.block_on(specport_cli::run(cli, &logger, &FsFileWriter));

    match outcome {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            logger.fatal(&format!("{e:#}"));
            Ok(ExitCode::FAILURE)
        }
    }
}
