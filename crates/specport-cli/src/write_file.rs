// ABOUTME: File writer used by commands that persist output to a user-supplied path.
// ABOUTME: Relative paths resolve against the working directory; parent directories are created.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while writing an output file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("output path is empty")]
    EmptyPath,

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Writes command output to disk and reports where it ended up.
#[async_trait]
pub trait FileWriter: Send + Sync {
    /// Write `contents` to `path` and return the absolute path written.
    async fn write(
        &self,
        path: &Path,
        contents: &str,
        working_dir: &Path,
    ) -> Result<PathBuf, WriteError>;
}

/// Writes to the local filesystem with tokio::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileWriter;

/// Resolve an output path against the working directory and make it absolute.
pub fn resolve_output_path(path: &Path, working_dir: &Path) -> Result<PathBuf, WriteError> {
    if path.as_os_str().is_empty() {
        return Err(WriteError::EmptyPath);
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    };
    std::path::absolute(&joined).map_err(|source| WriteError::Write {
        path: joined.clone(),
        source,
    })
}

#[async_trait]
impl FileWriter for FsFileWriter {
    async fn write(
        &self,
        path: &Path,
        contents: &str,
        working_dir: &Path,
    ) -> Result<PathBuf, WriteError> {
        let output_path = resolve_output_path(path, working_dir)?;

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&output_path, contents)
            .await
            .map_err(|source| WriteError::Write {
                path: output_path.clone(),
                source,
            })?;

        tracing::debug!("wrote {} bytes to {}", contents.len(), output_path.display());
        Ok(output_path)
    }
}
