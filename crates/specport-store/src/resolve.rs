// ABOUTME: Picks the workspace backend for a working directory and resolves spec identifiers.
// ABOUTME: Identifiers match record ids, then file names, then files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use specport_core::{ApiSpec, ContentType};

use crate::git_repo::GitRepoStore;
use crate::sqlite::SqliteStore;
use crate::store::{EmptyStore, StoreError, WorkspaceStore};

/// File name of the SQLite database inside the app data directory.
pub const APP_DATABASE_FILE: &str = "specport.db";

/// Choose the store for a working directory.
///
/// A git-synced workspace (one with a `.insomnia` data directory) always wins.
/// Otherwise the app database is used if it exists. It is opened read-only and
/// is never created or migrated here.
/// With neither, every lookup comes back empty.
pub fn load_store(
    working_dir: &Path,
    app_data_dir: Option<&Path>,
) -> Result<Box<dyn WorkspaceStore>, StoreError> {
    if let Some(store) = GitRepoStore::open(working_dir) {
        tracing::debug!("using git-repo store at {}", store.data_dir().display());
        return Ok(Box::new(store));
    }

    if let Some(app_data_dir) = app_data_dir {
        let db_path = app_data_dir.join(APP_DATABASE_FILE);
        if db_path.is_file() {
            tracing::debug!("using app database at {}", db_path.display());
            return Ok(Box::new(SqliteStore::open_read_only(&db_path)?));
        }
    }

    tracing::debug!(
        "no workspace data found for {}, using empty store",
        working_dir.display()
    );
    Ok(Box::new(EmptyStore))
}

/// Resolve an identifier to a specification record.
///
/// With an identifier: store lookup by id or file name, then a file path
/// relative to `working_dir` (or absolute). Without one: the only spec in the
/// store, unless `ci` is set, since picking implicitly is unsafe in automation.
pub fn resolve_spec(
    store: &dyn WorkspaceStore,
    identifier: Option<&str>,
    working_dir: &Path,
    ci: bool,
) -> Result<Option<ApiSpec>, StoreError> {
    let Some(identifier) = identifier.filter(|id| !id.trim().is_empty()) else {
        if ci {
            tracing::debug!("no identifier given in ci mode");
            return Ok(None);
        }
        let mut specs = store.list()?;
        if specs.len() == 1 {
            return Ok(specs.pop());
        }
        tracing::debug!("no identifier given and {} specs to choose from", specs.len());
        return Ok(None);
    };

    if let Some(spec) = store.lookup(identifier)? {
        tracing::debug!("resolved {} from {} store", spec.id, store.kind());
        return Ok(Some(spec));
    }

    let candidate = spec_file_path(identifier, working_dir);
    if candidate.is_file() {
        tracing::debug!("resolved {} as a file on disk", candidate.display());
        return load_spec_file(&candidate).map(Some);
    }

    Ok(None)
}

fn spec_file_path(identifier: &str, working_dir: &Path) -> PathBuf {
    let path = Path::new(identifier);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

/// Load a standalone specification file as an ad-hoc record keyed by its path.
pub fn load_spec_file(path: &Path) -> Result<ApiSpec, StoreError> {
    let contents = fs::read_to_string(path)?;
    let modified = fs::metadata(path)?
        .modified()
        .ok()
        .map(DateTime::<Utc>::from);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ApiSpec {
        id: path.display().to_string(),
        parent_id: None,
        file_name,
        content_type: ContentType::detect(path, &contents),
        contents,
        modified,
    })
}
