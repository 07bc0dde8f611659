// ABOUTME: Workspace stores for specport, resolving specification records by identifier.
// ABOUTME: Provides the git-repo data directory reader, the SQLite app database, and backend selection.

pub mod git_repo;
pub mod resolve;
pub mod sqlite;
pub mod store;

pub use git_repo::{GIT_DATA_DIR, GitRepoStore};
pub use resolve::{APP_DATABASE_FILE, load_spec_file, load_store, resolve_spec};
pub use sqlite::{SqliteError, SqliteStore};
pub use store::{EmptyStore, StoreError, WorkspaceStore};
