// ABOUTME: The WorkspaceStore trait shared by every specification backend.
// ABOUTME: Lookup matches by record id first, then by file name.

use specport_core::ApiSpec;
use thiserror::Error;

use crate::sqlite::SqliteError;

/// Errors that can occur while reading a workspace store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] SqliteError),
}

/// A read-only source of specification records for one workspace.
pub trait WorkspaceStore {
    /// Short name of the backend, used in diagnostics.
    fn kind(&self) -> &'static str;

    /// All specification records, in a stable order.
    fn list(&self) -> Result<Vec<ApiSpec>, StoreError>;

    /// Find a record by id, falling back to an exact file name match.
    fn lookup(&self, identifier: &str) -> Result<Option<ApiSpec>, StoreError> {
        Ok(find_spec(self.list()?, identifier))
    }
}

/// Pick the record whose id matches, else the one whose file name matches.
pub(crate) fn find_spec(specs: Vec<ApiSpec>, identifier: &str) -> Option<ApiSpec> {
    match specs.iter().position(|s| s.id == identifier) {
        Some(index) => specs.into_iter().nth(index),
        None => specs.into_iter().find(|s| s.file_name == identifier),
    }
}

/// A store with no records, used when a working directory has no workspace data.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStore;

impl WorkspaceStore for EmptyStore {
    fn kind(&self) -> &'static str {
        "empty"
    }

    fn list(&self) -> Result<Vec<ApiSpec>, StoreError> {
        Ok(Vec::new())
    }
}
