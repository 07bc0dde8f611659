// ABOUTME: The `export spec` command: load a specification from the workspace and print or write it.
// ABOUTME: Optionally strips x-kong-* annotations before output.

use std::path::PathBuf;

use clap::Args;
use specport_core::{ApiSpec, DocumentError, SpecDocument};
use specport_store::{StoreError, load_store, resolve_spec};
use thiserror::Error;

use crate::config::{RcFile, SpecportConfig};
use crate::logger::Logger;
use crate::write_file::{FileWriter, WriteError};

/// Arguments for the `export spec` command.
#[derive(Debug, Args)]
pub struct ExportSpecArgs {
    /// Spec id, file name, or path to a spec file. May be omitted when the
    /// workspace holds a single spec.
    #[arg()]
    pub identifier: Option<String>,

    /// Write the spec to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Remove all x-kong-* annotations from the exported document.
    #[arg(long)]
    pub skip_annotations: bool,
}

/// Options for a single export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    pub working_dir: PathBuf,
    pub output: Option<PathBuf>,
    pub skip_annotations: bool,
    pub app_data_dir: Option<PathBuf>,
    pub ci: bool,
}

impl ExportOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_skip_annotations(mut self, skip_annotations: bool) -> Self {
        self.skip_annotations = skip_annotations;
        self
    }
}

/// Errors that abort an export. A missing spec is not one of them.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The file writer failed; its error is passed through untouched.
    #[error(transparent)]
    Write(WriteError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

/// Export one specification.
///
/// Returns `Ok(false)` after a fatal log entry when the identifier cannot be
/// resolved. Without an output path the document is logged; with one it is
/// handed to `writer` and a confirmation is logged. Writer failures are
/// returned as [`ExportError::Write`] without logging.
pub async fn export_specification(
    identifier: Option<&str>,
    options: &ExportOptions,
    logger: &dyn Logger,
    writer: &dyn FileWriter,
) -> Result<bool, ExportError> {
    let spec = {
        let store = load_store(&options.working_dir, options.app_data_dir.as_deref())?;
        resolve_spec(store.as_ref(), identifier, &options.working_dir, options.ci)?
    };

    let Some(spec) = spec.filter(ApiSpec::has_contents) else {
        let location = match identifier {
            Some(id) if !id.trim().is_empty() => id.to_owned(),
            _ => options.working_dir.display().to_string(),
        };
        logger.fatal(&format!("Specification not found at: {location}"));
        return Ok(false);
    };

    let contents = render_contents(&spec, options.skip_annotations)?;

    let Some(output) = &options.output else {
        logger.log(&contents);
        return Ok(true);
    };

    let final_path = writer
        .write(output, &contents, &options.working_dir)
        .await
        .map_err(ExportError::Write)?;
    logger.log(&format!(
        "Specification exported to \"{}\".",
        final_path.display()
    ));
    Ok(true)
}

/// The text to export: stored contents verbatim, or re-serialized without annotations.
fn render_contents(spec: &ApiSpec, skip_annotations: bool) -> Result<String, DocumentError> {
    if !skip_annotations {
        return Ok(spec.contents.clone());
    }

    let mut document = SpecDocument::parse(&spec.contents, spec.content_type)?;
    let removed = document.strip_annotations();
    tracing::debug!(
        "removed {} x-kong annotations from {} ({} document, openapi {})",
        removed,
        spec.id,
        document.content_type(),
        document.openapi_version().as_deref().unwrap_or("unknown")
    );
    document.to_text()
}

/// Execute the `export spec` command.
///
/// Command-line flags take precedence over `.specportrc.yaml` defaults.
///
/// # Errors
///
/// Returns an error if the rc file is invalid, the store cannot be read, or
/// the output file cannot be written.
pub async fn execute(
    args: ExportSpecArgs,
    config: &SpecportConfig,
    logger: &dyn Logger,
    writer: &dyn FileWriter,
) -> anyhow::Result<bool> {
    let rc = RcFile::load(&config.working_dir)?;

    let options = ExportOptions {
        working_dir: config.working_dir.clone(),
        output: args.output.or(rc.options.output),
        skip_annotations: args.skip_annotations || rc.options.skip_annotations.unwrap_or(false),
        app_data_dir: config.app_data_dir.clone(),
        ci: config.ci,
    };

    Ok(export_specification(args.identifier.as_deref(), &options, logger, writer).await?)
}
