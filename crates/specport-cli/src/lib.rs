// ABOUTME: Command-line layer for specport: argument parsing, configuration, and command dispatch.
// ABOUTME: Output sinks and the file writer are injected so commands can run against test doubles.

pub mod commands;
pub mod config;
pub mod logger;
pub mod testing;
pub mod write_file;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::export_specification::{
    ExportError, ExportOptions, ExportSpecArgs, export_specification,
};
pub use config::{ConfigError, ConfigOverrides, RcFile, SpecportConfig};
pub use logger::{ConsoleLogger, Logger};
pub use write_file::{FileWriter, FsFileWriter, WriteError};

/// Export API specifications from a local workspace.
#[derive(Debug, Parser)]
#[command(name = "specport", version, about)]
pub struct Cli {
    /// Workspace root holding the .insomnia data directory.
    #[arg(long, short = 'w', global = true)]
    pub working_dir: Option<PathBuf>,

    /// Directory holding the specport app database.
    #[arg(long, global = true)]
    pub app_data_dir: Option<PathBuf>,

    /// Never pick a spec implicitly.
    #[arg(long, global = true)]
    pub ci: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export workspace data.
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Debug, Subcommand)]
pub enum ExportCommands {
    /// Export an API specification.
    Spec(ExportSpecArgs),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            working_dir: self.working_dir.clone(),
            app_data_dir: self.app_data_dir.clone(),
            ci: self.ci,
        }
    }
}

/// Run a parsed command line. `Ok(false)` means the command reported a
/// failure to the user and the process should exit unsuccessfully.
pub async fn run(cli: Cli, logger: &dyn Logger, writer: &dyn FileWriter) -> anyhow::Result<bool> {
    let config = SpecportConfig::from_env(cli.overrides())?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Export(ExportCommands::Spec(args)) => {
            commands::export_specification::execute(args, &config, logger, writer).await
        }
    }
}
